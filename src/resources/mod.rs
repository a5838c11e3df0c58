pub mod entitlements;
pub mod groups;
pub mod licenses;
pub mod machines;
pub mod policies;
pub mod products;
pub mod request_logs;
pub mod users;
pub mod webhooks;

pub use entitlements::*;
pub use groups::*;
pub use licenses::*;
pub use machines::*;
pub use policies::*;
pub use products::*;
pub use request_logs::*;
pub use users::*;
pub use webhooks::*;

use crate::{
    client::{pagination, Params},
    err::Error,
    Result,
};

/// Pagination shared by the plain list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ListOptions {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            page: None,
        }
    }

    pub(crate) fn params(&self) -> Params {
        pagination(self.limit, self.page)
    }
}

// trims a free-text field, dropping it when nothing is left
pub(crate) fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

// required text field: trimmed, rejected when blank before any request is made
pub(crate) fn required(value: &str, field: &str, message: &str) -> Result<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::validation(field, message));
    }

    Ok(value.to_owned())
}

// same as `required` for an update, where leaving the field out is fine
pub(crate) fn required_opt(
    value: &Option<String>,
    field: &str,
    message: &str,
) -> Result<Option<String>> {
    value
        .as_deref()
        .map(|value| required(value, field, message))
        .transpose()
}

// create payloads treat a zero limit as "not set"
pub(crate) fn non_zero(value: Option<u64>) -> Option<u64> {
    value.filter(|value| *value != 0)
}
