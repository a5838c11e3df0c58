use super::{non_zero, required, required_opt, ListOptions};
use crate::{
    client::{
        linkage, pagination, Document, KeygenClient, ListDocument, RequestOptions,
        ResourceIdentifier, WriteDocument,
    },
    models::{Group, GroupAttributes, LicenseAttributes, UserAttributes},
    Result,
};
use serde::Serialize;

const GROUPS: &str = "groups";

#[derive(Debug, Clone, Default)]
pub struct GroupFilters {
    pub name: Option<String>,
    pub max_licenses: Option<u64>,
    pub max_machines: Option<u64>,
    pub max_users: Option<u64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_licenses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_machines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_licenses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_machines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<u64>,
}

pub struct GroupResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> GroupResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &GroupFilters) -> Result<ListDocument<GroupAttributes>> {
        let params = pagination(filters.limit, filters.page)
            .insert_opt("name", filters.name.as_deref())
            .insert_opt("maxLicenses", non_zero(filters.max_licenses))
            .insert_opt("maxMachines", non_zero(filters.max_machines))
            .insert_opt("maxUsers", non_zero(filters.max_users));

        self.client
            .request(GROUPS, RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Group>> {
        self.client
            .request(&format!("groups/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, group: &NewGroup) -> Result<Document<Group>> {
        // zero limits are dropped on create, see DESIGN.md
        let group = NewGroup {
            name: required(&group.name, "name", "Group name is required")?,
            max_licenses: non_zero(group.max_licenses),
            max_machines: non_zero(group.max_machines),
            max_users: non_zero(group.max_users),
        };
        let body = WriteDocument::create(GROUPS, &group);

        self.client
            .request(GROUPS, RequestOptions::post().json(&body)?)
            .await
    }

    /// Zero limits are sent as given here, unlike `create`.
    pub async fn update(&self, id: &str, updates: &GroupUpdate) -> Result<Document<Group>> {
        let updates = GroupUpdate {
            name: required_opt(&updates.name, "name", "Group name is required")?,
            ..updates.clone()
        };
        let body = WriteDocument::update(GROUPS, id, &updates);

        self.client
            .request(&format!("groups/{}", id), RequestOptions::patch().json(&body)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("groups/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    pub async fn licenses(
        &self,
        id: &str,
        options: &ListOptions,
    ) -> Result<ListDocument<LicenseAttributes>> {
        self.client
            .request(
                &format!("groups/{}/licenses", id),
                RequestOptions::get().params(options.params()),
            )
            .await
    }

    pub async fn users(&self, id: &str, options: &ListOptions) -> Result<ListDocument<UserAttributes>> {
        self.client
            .request(
                &format!("groups/{}/users", id),
                RequestOptions::get().params(options.params()),
            )
            .await
    }

    async fn link(&self, id: &str, name: &str, identifier: ResourceIdentifier) -> Result<()> {
        self.client
            .request_raw(
                &format!("groups/{}/relationships/{}", id, name),
                RequestOptions::post().json(&linkage(identifier))?,
            )
            .await?;

        Ok(())
    }

    async fn unlink(&self, id: &str, name: &str, identifier: ResourceIdentifier) -> Result<()> {
        self.client
            .request_raw(
                &format!("groups/{}/relationships/{}", id, name),
                RequestOptions::delete().json(&linkage(identifier))?,
            )
            .await?;

        Ok(())
    }

    pub async fn add_user(&self, id: &str, user_id: &str) -> Result<()> {
        self.link(id, "users", ResourceIdentifier::new("users", user_id))
            .await
    }

    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<()> {
        self.unlink(id, "users", ResourceIdentifier::new("users", user_id))
            .await
    }

    pub async fn add_license(&self, id: &str, license_id: &str) -> Result<()> {
        self.link(id, "licenses", ResourceIdentifier::new("licenses", license_id))
            .await
    }

    pub async fn remove_license(&self, id: &str, license_id: &str) -> Result<()> {
        self.unlink(id, "licenses", ResourceIdentifier::new("licenses", license_id))
            .await
    }
}
