use super::trimmed;
use crate::{
    client::{pagination, Document, KeygenClient, ListDocument, RequestOptions, WriteDocument},
    models::{LicenseAttributes, MachineAttributes, User, UserAttributes, UserRole, UserStatus},
    Result,
};
use serde::Serialize;
use serde_json::{Map, Value};

const USERS: &str = "users";

#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

pub struct UserResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> UserResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<ListDocument<UserAttributes>> {
        let params = pagination(filters.limit, filters.page)
            .insert_opt("email", filters.email.as_deref())
            .insert_opt("role", filters.role.map(|role| role.as_str()))
            .insert_opt("status", filters.status.map(|status| status.as_str()));

        self.client
            .request(USERS, RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<User>> {
        self.client
            .request(&format!("users/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, user: &NewUser) -> Result<Document<User>> {
        let user = NewUser {
            email: user.email.trim().into(),
            first_name: trimmed(&user.first_name),
            last_name: trimmed(&user.last_name),
            ..user.clone()
        };
        let body = WriteDocument::create(USERS, &user);

        self.client
            .request(USERS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &UserUpdate) -> Result<Document<User>> {
        let body = WriteDocument::update(USERS, id, updates);

        self.client
            .request(&format!("users/{}", id), RequestOptions::patch().json(&body)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("users/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    pub async fn ban(&self, id: &str) -> Result<Document<User>> {
        self.client
            .request(&format!("users/{}/actions/ban", id), RequestOptions::post())
            .await
    }

    pub async fn unban(&self, id: &str) -> Result<Document<User>> {
        self.client
            .request(&format!("users/{}/actions/unban", id), RequestOptions::post())
            .await
    }

    pub async fn update_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<Document<User>> {
        let body = serde_json::json!({
            "meta": {
                "oldPassword": old_password,
                "newPassword": new_password
            }
        });

        self.client
            .request(
                &format!("users/{}/actions/update-password", id),
                RequestOptions::post().json(&body)?,
            )
            .await
    }

    pub async fn licenses(&self, id: &str) -> Result<ListDocument<LicenseAttributes>> {
        self.client
            .request(&format!("users/{}/licenses", id), RequestOptions::get())
            .await
    }

    pub async fn machines(&self, id: &str) -> Result<ListDocument<MachineAttributes>> {
        self.client
            .request(&format!("users/{}/machines", id), RequestOptions::get())
            .await
    }
}
