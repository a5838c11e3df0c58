use super::{required, trimmed};
use crate::{
    client::{
        linkage, pagination, Document, KeygenClient, ListDocument, RequestOptions,
        ResourceIdentifier, WriteDocument,
    },
    models::{ComponentAttributes, Machine, MachineAttributes, ProcessAttributes},
    Result,
};
use serde::Serialize;

const MACHINES: &str = "machines";

#[derive(Debug, Clone, Default)]
pub struct MachineFilters {
    pub license: Option<String>,
    pub user: Option<String>,
    pub group: Option<String>,
    pub fingerprint: Option<String>,
    pub ip: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMachine {
    pub fingerprint: String,
    #[serde(skip)]
    pub license_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_heartbeat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_duration: Option<u64>,
}

pub struct MachineResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> MachineResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &MachineFilters) -> Result<ListDocument<MachineAttributes>> {
        let params = pagination(filters.limit, filters.page)
            .insert_opt("license", filters.license.as_deref())
            .insert_opt("user", filters.user.as_deref())
            .insert_opt("group", filters.group.as_deref())
            .insert_opt("fingerprint", filters.fingerprint.as_deref())
            .insert_opt("ip", filters.ip.as_deref());

        self.client
            .request(MACHINES, RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Machine>> {
        self.client
            .request(&format!("machines/{}", id), RequestOptions::get())
            .await
    }

    /// Activates a machine for a license.
    pub async fn activate(&self, machine: &NewMachine) -> Result<Document<Machine>> {
        let machine = NewMachine {
            fingerprint: required(
                &machine.fingerprint,
                "fingerprint",
                "Machine fingerprint is required",
            )?,
            name: trimmed(&machine.name),
            platform: trimmed(&machine.platform),
            hostname: trimmed(&machine.hostname),
            ip: trimmed(&machine.ip),
            ..machine.clone()
        };

        let body = WriteDocument::create(MACHINES, &machine).relate(
            "license",
            ResourceIdentifier::new("licenses", &machine.license_id),
        );

        self.client
            .request(MACHINES, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &MachineUpdate) -> Result<Document<Machine>> {
        let body = WriteDocument::update(MACHINES, id, updates);

        self.client
            .request(
                &format!("machines/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn deactivate(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("machines/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    async fn action(&self, id: &str, verb: &str) -> Result<Document<Machine>> {
        self.client
            .request(
                &format!("machines/{}/actions/{}", id, verb),
                RequestOptions::post(),
            )
            .await
    }

    pub async fn check_out(&self, id: &str) -> Result<Document<Machine>> {
        self.action(id, "check-out").await
    }

    pub async fn ping(&self, id: &str) -> Result<Document<Machine>> {
        self.action(id, "ping").await
    }

    pub async fn reset_heartbeat(&self, id: &str) -> Result<Document<Machine>> {
        self.action(id, "reset").await
    }

    pub async fn processes(&self, id: &str) -> Result<ListDocument<ProcessAttributes>> {
        self.client
            .request(&format!("machines/{}/processes", id), RequestOptions::get())
            .await
    }

    pub async fn components(&self, id: &str) -> Result<ListDocument<ComponentAttributes>> {
        self.client
            .request(
                &format!("machines/{}/components", id),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn change_owner(&self, id: &str, user_id: &str) -> Result<Document<Machine>> {
        self.client
            .request(
                &format!("machines/{}/relationships/user", id),
                RequestOptions::patch().json(&linkage(ResourceIdentifier::new("users", user_id)))?,
            )
            .await
    }

    pub async fn change_group(&self, id: &str, group_id: &str) -> Result<Document<Machine>> {
        self.client
            .request(
                &format!("machines/{}/relationships/group", id),
                RequestOptions::patch()
                    .json(&linkage(ResourceIdentifier::new("groups", group_id)))?,
            )
            .await
    }
}
