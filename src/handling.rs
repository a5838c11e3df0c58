use crate::err::{Error, ErrorKind};
use serde::Serialize;
use std::fmt;
use tracing::error;

const NETWORK_FAILED: &str = "Network connection failed - please check your internet connection";
const AUTH_REQUIRED: &str = "Authentication required - please log in again";
const PERMISSION_DENIED: &str = "Permission denied - insufficient access rights";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    Create,
    Update,
    Delete,
}

impl CrudOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandlerOptions {
    pub custom_message: Option<String>,
    pub silent: bool,
}

impl HandlerOptions {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            custom_message: Some(message.into()),
            silent: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            custom_message: None,
            silent: true,
        }
    }
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "camelCase")]
pub enum Action {
    /// The resource is gone, reload the view.
    Refresh,
    /// Input was rejected, show the message next to the form.
    Invalid(String),
    Forbidden,
    Reauthenticate,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorOutcome {
    pub kind: ErrorKind,
    pub action: Action,
    pub toast: Option<String>,
}

impl ErrorOutcome {
    fn new(err: &Error, action: Action, toast: Option<String>) -> Self {
        Self {
            kind: err.kind(),
            action,
            toast,
        }
    }
}

// toast only when the error kind allows it and the caller did not opt out
fn toast(err: &Error, options: &HandlerOptions, message: String) -> Option<String> {
    (err.should_show_toast() && !options.silent).then_some(message)
}

fn custom_or(options: &HandlerOptions, message: impl FnOnce() -> String) -> String {
    options.custom_message.clone().unwrap_or_else(message)
}

fn non_empty(message: String) -> Option<String> {
    Some(message).filter(|message| !message.trim().is_empty())
}

pub fn handle_crud_error(
    err: &Error,
    operation: CrudOperation,
    resource: &str,
    options: &HandlerOptions,
) -> ErrorOutcome {
    error!(%operation, resource, error = %err, "failed to {} {}", operation, resource);

    let lower = resource.to_lowercase();

    if err.is_not_found() {
        let message = custom_or(options, || {
            format!("{} not found - it may have been deleted", resource)
        });
        return ErrorOutcome::new(err, Action::Refresh, toast(err, options, message));
    }

    if err.is_unprocessable() {
        let message = custom_or(options, || {
            non_empty(err.combined_message()).unwrap_or_else(|| {
                format!("Invalid {} data - please check your input", lower)
            })
        });
        return ErrorOutcome::new(
            err,
            Action::Invalid(message.clone()),
            toast(err, options, message),
        );
    }

    if err.is_forbidden() {
        let message = custom_or(options, || PERMISSION_DENIED.into());
        return ErrorOutcome::new(err, Action::Forbidden, toast(err, options, message));
    }

    if err.is_unauthorized() {
        return ErrorOutcome::new(
            err,
            Action::Reauthenticate,
            toast(err, options, AUTH_REQUIRED.into()),
        );
    }

    if err.is_network_error() {
        return ErrorOutcome::new(err, Action::None, toast(err, options, NETWORK_FAILED.into()));
    }

    let message = custom_or(options, || {
        format!("Failed to {} {}: {}", operation, lower, err.message())
    });
    ErrorOutcome::new(err, Action::None, toast(err, options, message))
}

pub fn handle_load_error(err: &Error, resource: &str, options: &HandlerOptions) -> ErrorOutcome {
    error!(resource, error = %err, "failed to load {}", resource);

    let action = if err.is_not_found() {
        Action::Refresh
    } else if err.is_unauthorized() {
        Action::Reauthenticate
    } else {
        Action::None
    };

    if options.silent {
        return ErrorOutcome::new(err, action, None);
    }

    // shown regardless of should_show_toast
    if err.is_network_error() {
        return ErrorOutcome::new(err, action, Some(NETWORK_FAILED.into()));
    }
    if err.is_unauthorized() {
        return ErrorOutcome::new(err, action, Some(AUTH_REQUIRED.into()));
    }

    let message = custom_or(options, || format!("Failed to load {}", resource.to_lowercase()));
    ErrorOutcome::new(err, action, toast(err, options, message))
}

pub fn handle_form_error(err: &Error, form: &str, options: &HandlerOptions) -> ErrorOutcome {
    error!(form, error = %err, "form submission error");

    if err.is_validation_error() {
        return ErrorOutcome::new(err, Action::Invalid(err.message()), None);
    }

    if err.is_unprocessable() {
        let message = non_empty(err.combined_message())
            .unwrap_or_else(|| "Please check your input and try again".into());
        return ErrorOutcome::new(err, Action::Invalid(message), None);
    }

    handle_crud_error(err, CrudOperation::Create, form, options)
}

pub fn handle_auth_error(err: &Error) -> ErrorOutcome {
    let combined = non_empty(err.combined_message());
    error!(error = %err, "authentication error");

    let message = if err.is_auth_error() || err.is_unauthorized() {
        combined.unwrap_or_else(|| "Authentication failed - please check your credentials".into())
    } else if err.is_network_error() {
        "Cannot connect to authentication server".into()
    } else {
        combined.unwrap_or_else(|| "Login failed - please try again".into())
    };

    ErrorOutcome::new(err, Action::None, Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::{ApiError, AuthCode, NetworkCode};

    fn api(status: u16, title: &str, detail: &str) -> Error {
        Error::Api {
            status,
            errors: vec![ApiError::new(title, detail)],
        }
    }

    fn network() -> Error {
        Error::Network {
            code: NetworkCode::Timeout,
            detail: "timed out".into(),
        }
    }

    #[test]
    fn crud_not_found_asks_for_refresh() {
        let outcome = handle_crud_error(
            &api(404, "Not found", "License not found"),
            CrudOperation::Delete,
            "License",
            &HandlerOptions::default(),
        );

        assert_eq!(outcome.kind, ErrorKind::Api);
        assert_eq!(outcome.action, Action::Refresh);
        assert_eq!(
            outcome.toast.as_deref(),
            Some("License not found - it may have been deleted")
        );
    }

    #[test]
    fn crud_unprocessable_uses_api_details() {
        let outcome = handle_crud_error(
            &api(422, "Unprocessable resource", "must be unique"),
            CrudOperation::Create,
            "Policy",
            &HandlerOptions::default(),
        );

        assert_eq!(
            outcome.action,
            Action::Invalid("Unprocessable resource: must be unique".into())
        );
    }

    #[test]
    fn crud_unauthorized_has_no_toast() {
        let outcome = handle_crud_error(
            &api(401, "Unauthorized", "token expired"),
            CrudOperation::Update,
            "User",
            &HandlerOptions::default(),
        );

        assert_eq!(outcome.action, Action::Reauthenticate);
        assert_eq!(outcome.toast, None);
    }

    #[test]
    fn crud_forbidden_honours_custom_message() {
        let outcome = handle_crud_error(
            &api(403, "Forbidden", "nope"),
            CrudOperation::Delete,
            "Product",
            &HandlerOptions::message("Only admins can delete products"),
        );

        assert_eq!(outcome.action, Action::Forbidden);
        assert_eq!(
            outcome.toast.as_deref(),
            Some("Only admins can delete products")
        );
    }

    #[test]
    fn crud_fallback_lowercases_resource() {
        let outcome = handle_crud_error(
            &api(500, "Internal error", "boom"),
            CrudOperation::Update,
            "Webhook",
            &HandlerOptions::default(),
        );

        assert_eq!(
            outcome.toast.as_deref(),
            Some("Failed to update webhook: Internal error: boom")
        );

        let outcome = handle_crud_error(
            &network(),
            CrudOperation::Update,
            "Webhook",
            &HandlerOptions::silent(),
        );
        assert_eq!(outcome.toast, None);
    }

    #[test]
    fn load_shows_unauthorized_unless_silent() {
        let err = api(401, "Unauthorized", "token expired");

        let outcome = handle_load_error(&err, "Licenses", &HandlerOptions::default());
        assert_eq!(outcome.toast.as_deref(), Some(AUTH_REQUIRED));

        let outcome = handle_load_error(&err, "Licenses", &HandlerOptions::silent());
        assert_eq!(outcome.toast, None);

        let outcome = handle_load_error(
            &api(500, "Internal error", "boom"),
            "Licenses",
            &HandlerOptions::default(),
        );
        assert_eq!(outcome.toast.as_deref(), Some("Failed to load licenses"));
    }

    #[test]
    fn form_validation_stays_inline() {
        let outcome = handle_form_error(
            &Error::validation("email", "Email is required"),
            "User",
            &HandlerOptions::default(),
        );

        assert_eq!(outcome.kind, ErrorKind::Validation);
        assert_eq!(outcome.action, Action::Invalid("Email is required".into()));
        assert_eq!(outcome.toast, None);

        let outcome = handle_form_error(&network(), "User", &HandlerOptions::default());
        assert_eq!(outcome.toast.as_deref(), Some(NETWORK_FAILED));
    }

    #[test]
    fn auth_messages() {
        let outcome = handle_auth_error(&Error::auth(
            AuthCode::InvalidCredentials,
            401,
            "Email or password is incorrect",
        ));
        assert_eq!(
            outcome.toast.as_deref(),
            Some("Email or password is incorrect")
        );

        let outcome = handle_auth_error(&network());
        assert_eq!(
            outcome.toast.as_deref(),
            Some("Cannot connect to authentication server")
        );
    }
}
