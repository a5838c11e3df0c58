use super::trimmed;
use crate::{
    client::{
        linkage, linkage_many, pagination, Document, KeygenClient, ListDocument, RequestOptions,
        ResourceIdentifier, WriteDocument,
    },
    models::{
        Entitlement, License, LicenseAttributes, LicenseStatus, MachineAttributes, Token,
    },
    Result,
};
use serde::Serialize;
use serde_json::{Map, Value};

const LICENSES: &str = "licenses";

#[derive(Debug, Clone, Default)]
pub struct LicenseFilters {
    pub status: Option<LicenseStatus>,
    pub user: Option<String>,
    pub policy: Option<String>,
    pub product: Option<String>,
    pub group: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLicense {
    #[serde(skip)]
    pub policy_id: String,
    #[serde(skip)]
    pub user_id: Option<String>,
    #[serde(skip)]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl LicenseUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct LicenseResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> LicenseResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &LicenseFilters) -> Result<ListDocument<LicenseAttributes>> {
        let params = pagination(filters.limit, filters.page)
            .insert_opt("status", filters.status.map(|status| status.as_str()))
            .insert_opt("user", filters.user.as_deref())
            .insert_opt("policy", filters.policy.as_deref())
            .insert_opt("product", filters.product.as_deref())
            .insert_opt("group", filters.group.as_deref());

        self.client
            .request(LICENSES, RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<License>> {
        self.client
            .request(&format!("licenses/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, license: &NewLicense) -> Result<Document<License>> {
        let license = NewLicense {
            name: trimmed(&license.name),
            ..license.clone()
        };

        let body = WriteDocument::create(LICENSES, &license)
            .relate("policy", ResourceIdentifier::new("policies", &license.policy_id))
            .relate_opt(
                "user",
                license
                    .user_id
                    .as_ref()
                    .map(|id| ResourceIdentifier::new("users", id)),
            )
            .relate_opt(
                "group",
                license
                    .group_id
                    .as_ref()
                    .map(|id| ResourceIdentifier::new("groups", id)),
            );

        self.client
            .request(LICENSES, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &LicenseUpdate) -> Result<Document<License>> {
        let body = WriteDocument::update(LICENSES, id, updates);

        self.client
            .request(
                &format!("licenses/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("licenses/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    async fn action(&self, id: &str, verb: &str) -> Result<Document<License>> {
        self.client
            .request(
                &format!("licenses/{}/actions/{}", id, verb),
                RequestOptions::post(),
            )
            .await
    }

    pub async fn suspend(&self, id: &str) -> Result<Document<License>> {
        self.action(id, "suspend").await
    }

    pub async fn reinstate(&self, id: &str) -> Result<Document<License>> {
        self.action(id, "reinstate").await
    }

    pub async fn renew(&self, id: &str) -> Result<Document<License>> {
        self.action(id, "renew").await
    }

    /// Validates by id; the verdict is in `meta` (`valid`, `code`, `detail`).
    pub async fn validate(&self, id: &str) -> Result<Document<License>> {
        self.action(id, "validate").await
    }

    pub async fn revoke(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(
                &format!("licenses/{}/actions/revoke", id),
                RequestOptions::delete(),
            )
            .await?;

        Ok(())
    }

    /// Issues an activation token scoped to this license.
    pub async fn generate_activation_token(&self, id: &str) -> Result<Document<Token>> {
        self.client
            .request(&format!("licenses/{}/tokens", id), RequestOptions::post())
            .await
    }

    pub async fn machines(&self, id: &str) -> Result<ListDocument<MachineAttributes>> {
        self.client
            .request(&format!("licenses/{}/machines", id), RequestOptions::get())
            .await
    }

    pub async fn entitlements(&self, id: &str) -> Result<Document<Vec<Entitlement>>> {
        self.client
            .request(
                &format!("licenses/{}/entitlements", id),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn attach_entitlements(&self, id: &str, entitlement_ids: &[&str]) -> Result<()> {
        let body = linkage_many(entitlement_identifiers(entitlement_ids));

        self.client
            .request_raw(
                &format!("licenses/{}/entitlements", id),
                RequestOptions::post().json(&body)?,
            )
            .await?;

        Ok(())
    }

    pub async fn detach_entitlements(&self, id: &str, entitlement_ids: &[&str]) -> Result<()> {
        let body = linkage_many(entitlement_identifiers(entitlement_ids));

        self.client
            .request_raw(
                &format!("licenses/{}/entitlements", id),
                RequestOptions::delete().json(&body)?,
            )
            .await?;

        Ok(())
    }

    async fn change_relationship(
        &self,
        id: &str,
        name: &str,
        identifier: ResourceIdentifier,
    ) -> Result<Document<License>> {
        self.client
            .request(
                &format!("licenses/{}/relationships/{}", id, name),
                RequestOptions::patch().json(&linkage(identifier))?,
            )
            .await
    }

    pub async fn change_policy(&self, id: &str, policy_id: &str) -> Result<Document<License>> {
        self.change_relationship(id, "policy", ResourceIdentifier::new("policies", policy_id))
            .await
    }

    pub async fn change_group(&self, id: &str, group_id: &str) -> Result<Document<License>> {
        self.change_relationship(id, "group", ResourceIdentifier::new("groups", group_id))
            .await
    }

    pub async fn change_owner(&self, id: &str, user_id: &str) -> Result<Document<License>> {
        self.change_relationship(id, "user", ResourceIdentifier::new("users", user_id))
            .await
    }
}

pub(crate) fn entitlement_identifiers(ids: &[&str]) -> Vec<ResourceIdentifier> {
    ids.iter()
        .map(|id| ResourceIdentifier::new("entitlements", *id))
        .collect()
}
