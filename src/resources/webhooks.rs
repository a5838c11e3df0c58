use super::{required, required_opt, ListOptions};
use crate::{
    client::{pagination, Document, KeygenClient, ListDocument, RequestOptions, WriteDocument},
    models::{Webhook, WebhookAttributes},
    Result,
};
use serde::Serialize;
use serde_json::Value;

const WEBHOOKS: &str = "webhooks";
const ENDPOINT_REQUIRED: &str = "Webhook endpoint URL is required";

pub const WEBHOOK_EVENTS: &[&str] = &[
    "account.updated",
    "license.created",
    "license.updated",
    "license.deleted",
    "license.suspended",
    "license.reinstated",
    "license.renewed",
    "license.expired",
    "machine.created",
    "machine.updated",
    "machine.deleted",
    "machine.heartbeat.ping",
    "machine.heartbeat.dead",
    "machine.heartbeat.resurrected",
    "product.created",
    "product.updated",
    "product.deleted",
    "policy.created",
    "policy.updated",
    "policy.deleted",
    "user.created",
    "user.updated",
    "user.deleted",
    "group.created",
    "group.updated",
    "group.deleted",
    "entitlement.created",
    "entitlement.updated",
    "entitlement.deleted",
    "release.created",
    "release.updated",
    "release.deleted",
    "release.published",
    "release.yanked",
];

pub const TEST_EVENT: &str = "webhook.test";

/// Events grouped by the resource before the first `.`, in list order.
pub fn events_by_category() -> Vec<(&'static str, Vec<&'static str>)> {
    let mut categories: Vec<(&'static str, Vec<&'static str>)> = Vec::new();

    for event in WEBHOOK_EVENTS {
        let resource = event.split('.').next().unwrap_or(event);

        match categories.iter_mut().find(|(name, _)| *name == resource) {
            Some((_, events)) => events.push(event),
            None => categories.push((resource, vec![event])),
        }
    }

    categories
}

#[derive(Debug, Clone, Default)]
pub struct WebhookFilters {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub events: Vec<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewWebhook {
    pub endpoint: String,
    pub events: Vec<String>,
    pub enabled: bool,
}

impl NewWebhook {
    pub fn new(endpoint: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            events,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

pub struct WebhookResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> WebhookResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &WebhookFilters) -> Result<ListDocument<WebhookAttributes>> {
        let events = Some(filters.events.join(",")).filter(|events| !events.is_empty());

        let params = pagination(filters.limit, filters.page)
            .insert_opt("enabled", filters.enabled)
            .insert_opt("endpoint", filters.endpoint.as_deref())
            .insert_opt("events", events);

        self.client
            .request(WEBHOOKS, RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Webhook>> {
        self.client
            .request(&format!("webhooks/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, webhook: &NewWebhook) -> Result<Document<Webhook>> {
        let webhook = NewWebhook {
            endpoint: required(&webhook.endpoint, "endpoint", ENDPOINT_REQUIRED)?,
            ..webhook.clone()
        };
        let body = WriteDocument::create(WEBHOOKS, &webhook);

        self.client
            .request(WEBHOOKS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &WebhookUpdate) -> Result<Document<Webhook>> {
        let updates = WebhookUpdate {
            endpoint: required_opt(&updates.endpoint, "endpoint", ENDPOINT_REQUIRED)?,
            ..updates.clone()
        };
        let body = WriteDocument::update(WEBHOOKS, id, &updates);

        self.client
            .request(
                &format!("webhooks/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("webhooks/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    pub async fn enable(&self, id: &str) -> Result<Document<Webhook>> {
        self.set_enabled(id, true).await
    }

    pub async fn disable(&self, id: &str) -> Result<Document<Webhook>> {
        self.set_enabled(id, false).await
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> Result<Document<Webhook>> {
        let updates = WebhookUpdate {
            enabled: Some(enabled),
            ..Default::default()
        };

        self.update(id, &updates).await
    }

    /// Sends a test delivery, `event` defaults to `webhook.test`.
    pub async fn test(&self, id: &str, event: Option<&str>) -> Result<Document<Value>> {
        let body = serde_json::json!({
            "data": {
                "type": "webhook-events",
                "attributes": {
                    "event": event.unwrap_or(TEST_EVENT)
                }
            }
        });

        self.client
            .request(
                &format!("webhooks/{}/actions/test", id),
                RequestOptions::post().json(&body)?,
            )
            .await
    }

    pub async fn deliveries(&self, id: &str, options: &ListOptions) -> Result<Document<Vec<Value>>> {
        self.client
            .request(
                &format!("webhooks/{}/webhook-events", id),
                RequestOptions::get().params(options.params()),
            )
            .await
    }
}
