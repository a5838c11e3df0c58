use super::{required, required_opt, ListOptions};
use crate::{
    client::{Document, KeygenClient, ListDocument, RequestOptions, WriteDocument},
    models::{Entitlement, EntitlementAttributes},
    Result,
};
use serde::Serialize;
use serde_json::{Map, Value};

const ENTITLEMENTS: &str = "entitlements";

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewEntitlement {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntitlementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

pub struct EntitlementResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> EntitlementResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &ListOptions) -> Result<ListDocument<EntitlementAttributes>> {
        self.client
            .request(ENTITLEMENTS, RequestOptions::get().params(options.params()))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Entitlement>> {
        self.client
            .request(&format!("entitlements/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, entitlement: &NewEntitlement) -> Result<Document<Entitlement>> {
        let entitlement = NewEntitlement {
            name: required(&entitlement.name, "name", "Entitlement name is required")?,
            code: required(&entitlement.code, "code", "Entitlement code is required")?,
            metadata: entitlement.metadata.clone(),
        };
        let body = WriteDocument::create(ENTITLEMENTS, &entitlement);

        self.client
            .request(ENTITLEMENTS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        updates: &EntitlementUpdate,
    ) -> Result<Document<Entitlement>> {
        let updates = EntitlementUpdate {
            name: required_opt(&updates.name, "name", "Entitlement name is required")?,
            code: required_opt(&updates.code, "code", "Entitlement code is required")?,
            metadata: updates.metadata.clone(),
        };
        let body = WriteDocument::update(ENTITLEMENTS, id, &updates);

        self.client
            .request(
                &format!("entitlements/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("entitlements/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }
}
