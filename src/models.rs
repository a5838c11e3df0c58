use crate::{client::Resource, err::Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type User = Resource<UserAttributes>;
pub type License = Resource<LicenseAttributes>;
pub type Machine = Resource<MachineAttributes>;
pub type Product = Resource<ProductAttributes>;
pub type Policy = Resource<PolicyAttributes>;
pub type Group = Resource<GroupAttributes>;
pub type Entitlement = Resource<EntitlementAttributes>;
pub type Process = Resource<ProcessAttributes>;
pub type Component = Resource<ComponentAttributes>;
pub type RequestLog = Resource<RequestLogAttributes>;
pub type Webhook = Resource<WebhookAttributes>;
pub type Token = Resource<TokenAttributes>;

/// Server-set timestamps shared by every entity.
pub trait Timestamped {
    fn created(&self) -> &str;

    fn created_at(&self) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(self.created())
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|_| Error::Parse {
        code: crate::err::ParseCode::ParseError,
        detail: format!("Failed parsing timestamp: {}", value),
    })
}

macro_rules! timestamped {
    ($($attrs:ty),* $(,)?) => {
        $(
            impl Timestamped for $attrs {
                fn created(&self) -> &str {
                    &self.created
                }
            }
        )*
    };
}

timestamped!(
    UserAttributes,
    LicenseAttributes,
    MachineAttributes,
    ProductAttributes,
    PolicyAttributes,
    GroupAttributes,
    EntitlementAttributes,
    ProcessAttributes,
    ComponentAttributes,
    RequestLogAttributes,
    WebhookAttributes,
    TokenAttributes,
);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Developer,
    SalesAgent,
    SupportAgent,
    ReadOnly,
    User,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub banned: bool,
    pub last_signed_in_at: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
            Self::SalesAgent => "sales-agent",
            Self::SupportAgent => "support-agent",
            Self::ReadOnly => "read-only",
            Self::User => "user",
        }
    }
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }
}

impl UserAttributes {
    // older payloads only carry the `banned` flag
    pub fn is_banned(&self) -> bool {
        self.banned || self.status == Some(UserStatus::Banned)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Inactive,
    Expired,
    Suspended,
    Banned,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
            Self::Suspended => "suspended",
            Self::Banned => "banned",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAttributes {
    pub name: Option<String>,
    pub key: String,
    pub status: LicenseStatus,
    #[serde(default)]
    pub uses: u64,
    pub max_uses: Option<u64>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub floating: bool,
    #[serde(default)]
    pub strict: bool,
    pub scheme: Option<String>,
    #[serde(default)]
    pub encrypted: bool,
    pub expiry: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HeartbeatStatus {
    Alive,
    Dead,
    NotStarted,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineAttributes {
    pub name: Option<String>,
    pub fingerprint: String,
    pub platform: Option<String>,
    pub hostname: Option<String>,
    pub cores: Option<u32>,
    pub ip: Option<String>,
    #[serde(default)]
    pub require_heartbeat: bool,
    pub heartbeat_status: HeartbeatStatus,
    pub heartbeat_duration: Option<u64>,
    pub last_heartbeat: Option<String>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DistributionStrategy {
    Licensed,
    Open,
    Closed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    pub name: String,
    pub code: Option<String>,
    pub url: Option<String>,
    pub distribution_strategy: Option<DistributionStrategy>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckInInterval {
    Day,
    Week,
    Month,
    Year,
}

// strategy values are kept as strings: the backend keeps adding new ones
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyAttributes {
    pub name: String,
    pub duration: Option<u64>,
    pub strict: bool,
    pub floating: bool,
    pub require_product_scope: bool,
    pub require_policy_scope: bool,
    pub require_machine_scope: bool,
    pub require_fingerprint_scope: bool,
    pub require_components_scope: bool,
    pub require_user_scope: bool,
    pub require_checksum_scope: bool,
    pub require_version_scope: bool,
    pub require_check_in: bool,
    pub check_in_interval: Option<CheckInInterval>,
    pub check_in_interval_count: Option<u32>,
    pub use_pool: bool,
    pub max_machines: Option<u64>,
    pub max_processes: Option<u64>,
    pub max_cores: Option<u64>,
    pub max_uses: Option<u64>,
    pub protected: bool,
    pub require_heartbeat: bool,
    pub heartbeat_duration: Option<u64>,
    pub heartbeat_cull_strategy: Option<String>,
    pub heartbeat_resurrection_strategy: Option<String>,
    pub heartbeat_basis: Option<String>,
    pub machine_uniqueness_strategy: Option<String>,
    pub machine_matching_strategy: Option<String>,
    pub expiration_strategy: Option<String>,
    pub expiration_basis: Option<String>,
    pub renewal_basis: Option<String>,
    pub transfer_strategy: Option<String>,
    pub authentication_strategy: Option<String>,
    pub machine_leasing_strategy: Option<String>,
    pub process_leasing_strategy: Option<String>,
    pub overage_strategy: Option<String>,
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupAttributes {
    pub name: String,
    pub max_licenses: Option<u64>,
    pub max_machines: Option<u64>,
    pub max_users: Option<u64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EntitlementAttributes {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProcessAttributes {
    pub pid: u64,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComponentAttributes {
    pub name: String,
    pub fingerprint: String,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogAttributes {
    pub method: String,
    pub url: String,
    pub ip: Option<String>,
    pub status: u16,
    pub request_headers: Option<Map<String, Value>>,
    pub response_headers: Option<Map<String, Value>>,
    pub request_body: Option<Value>,
    pub response_body: Option<Value>,
    pub created: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAttributes {
    pub endpoint: String,
    #[serde(default)]
    pub events: Vec<String>,
    pub signing_key: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub created: String,
    pub updated: String,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenAttributes {
    pub kind: String,
    pub token: Option<String>,
    pub expiry: Option<String>,
    pub name: Option<String>,
    pub created: String,
    pub updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_license_resource() {
        let license: License = serde_json::from_value(json!({
            "id": "L1",
            "type": "licenses",
            "attributes": {
                "name": "Pro",
                "key": "KEY-1",
                "status": "suspended",
                "uses": 3,
                "maxUses": null,
                "protected": true,
                "floating": false,
                "strict": false,
                "scheme": null,
                "encrypted": false,
                "expiry": "2030-01-01T00:00:00.000Z",
                "metadata": { "notes": "vip" },
                "created": "2024-05-01T10:00:00.000Z",
                "updated": "2024-05-02T10:00:00.000Z",
                "lastValidated": "2024-05-02T10:00:00.000Z"
            }
        }))
        .unwrap();

        assert_eq!(license.attributes.status, LicenseStatus::Suspended);
        assert_eq!(license.attributes.metadata["notes"], "vip");
        assert_eq!(
            license.attributes.created_at().unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn reads_machine_heartbeat_status() {
        let attrs: MachineAttributes = serde_json::from_value(json!({
            "fingerprint": "F1",
            "heartbeatStatus": "not-started",
            "requireHeartbeat": false,
            "created": "2024-05-01T10:00:00Z",
            "updated": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(attrs.heartbeat_status, HeartbeatStatus::NotStarted);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<UserStatus>(json!("archived"));
        assert!(result.is_err());
    }

    #[test]
    fn legacy_banned_flag() {
        let attrs: UserAttributes = serde_json::from_value(json!({
            "email": "ops@example.com",
            "role": "sales-agent",
            "banned": true,
            "created": "2024-05-01T10:00:00Z",
            "updated": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(attrs.role, UserRole::SalesAgent);
        assert!(attrs.is_banned());
    }
}
