use super::{
    licenses::entitlement_identifiers, non_zero, required, required_opt, ListOptions,
};
use crate::{
    client::{
        linkage_many, Document, KeygenClient, ListDocument, RequestOptions, ResourceIdentifier,
        WriteDocument,
    },
    models::{EntitlementAttributes, Policy, PolicyAttributes},
    Result,
};
use serde::Serialize;
use serde_json::{Map, Value};

const POLICIES: &str = "policies";

/// Policy attributes accepted on create and update. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_machines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cores: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_heartbeat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_cull_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_resurrection_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_uniqueness_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_matching_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_leasing_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_leasing_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overage_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPolicy {
    pub product_id: String,
    pub name: String,
    pub settings: PolicyInput,
}

pub struct PolicyResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> PolicyResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &ListOptions) -> Result<ListDocument<PolicyAttributes>> {
        self.client
            .request(POLICIES, RequestOptions::get().params(options.params()))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Policy>> {
        self.client
            .request(&format!("policies/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, policy: &NewPolicy) -> Result<Document<Policy>> {
        let settings = &policy.settings;
        let attributes = PolicyInput {
            name: Some(required(&policy.name, "name", "Policy name is required")?),
            // a zero limit reads as "not set" here, it is not forwarded
            max_machines: non_zero(settings.max_machines),
            max_processes: non_zero(settings.max_processes),
            max_cores: non_zero(settings.max_cores),
            max_uses: non_zero(settings.max_uses),
            ..settings.clone()
        };

        let body = WriteDocument::create(POLICIES, &attributes).relate(
            "product",
            ResourceIdentifier::new("products", &policy.product_id),
        );

        self.client
            .request(POLICIES, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &PolicyInput) -> Result<Document<Policy>> {
        let updates = PolicyInput {
            name: required_opt(&updates.name, "name", "Policy name is required")?,
            ..updates.clone()
        };
        let body = WriteDocument::update(POLICIES, id, &updates);

        self.client
            .request(
                &format!("policies/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("policies/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    pub async fn entitlements(&self, id: &str) -> Result<ListDocument<EntitlementAttributes>> {
        self.client
            .request(
                &format!("policies/{}/entitlements", id),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn attach_entitlements(&self, id: &str, entitlement_ids: &[&str]) -> Result<()> {
        let body = linkage_many(entitlement_identifiers(entitlement_ids));

        self.client
            .request_raw(
                &format!("policies/{}/entitlements", id),
                RequestOptions::post().json(&body)?,
            )
            .await?;

        Ok(())
    }

    pub async fn detach_entitlements(&self, id: &str, entitlement_ids: &[&str]) -> Result<()> {
        let body = linkage_many(entitlement_identifiers(entitlement_ids));

        self.client
            .request_raw(
                &format!("policies/{}/entitlements", id),
                RequestOptions::delete().json(&body)?,
            )
            .await?;

        Ok(())
    }
}
