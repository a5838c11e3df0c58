use super::{combine_errors, Error};
use std::time::Duration;

pub const UNAUTHORIZED: u16 = 401;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const UNPROCESSABLE_ENTITY: u16 = 422;
pub const TOO_MANY_REQUESTS: u16 = 429;
pub const GATEWAY_TIMEOUT: u16 = 504;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Api,
    Network,
    Auth,
    Validation,
    Parse,
    App,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Api,
            Self::Network { .. } => ErrorKind::Network,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::App(_) | Self::Io(_) | Self::Config(_) => ErrorKind::App,
        }
    }

    /// HTTP status, present only on errors that came back from the backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { errors, .. } => errors.first().and_then(|e| e.code.as_deref()),
            Self::Network { code, .. } => Some(code.as_str()),
            Self::Auth { code, .. } => Some(code.as_str()),
            Self::Validation { .. } => Some("VALIDATION_ERROR"),
            Self::Parse { code, .. } => Some(code.as_str()),
            Self::App(_) | Self::Io(_) => Some("APP_ERROR"),
            Self::Config(_) => Some("CONFIG_ERROR"),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Network { detail, .. }
            | Self::Auth { detail, .. }
            | Self::Validation { detail, .. }
            | Self::Parse { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    /// `title: detail` pairs of every API error, or the plain message otherwise.
    pub fn combined_message(&self) -> String {
        match self {
            Self::Api { errors, .. } if !errors.is_empty() => combine_errors(errors),
            other => other.message(),
        }
    }

    pub fn user_friendly_message(&self, fallback: &str) -> String {
        let message = match self.kind() {
            // backend errors speak for themselves, 401 included
            ErrorKind::Api => self
                .api_errors()
                .first()
                .map(|e| e.detail.clone())
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| self.message()),
            ErrorKind::Network => {
                return "Connection failed - please check your internet connection".into()
            }
            ErrorKind::Auth => return "Authentication required - please log in".into(),
            ErrorKind::Validation if self.message().is_empty() => {
                return "Please check your input".into()
            }
            _ => self.message(),
        };

        if message.is_empty() {
            fallback.into()
        } else {
            message
        }
    }

    pub fn api_errors(&self) -> &[super::ApiError] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn is_api_error(&self) -> bool {
        self.status().is_some()
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_app_error(&self) -> bool {
        self.kind() == ErrorKind::App
    }

    pub fn has_status(&self, status: u16) -> bool {
        self.status() == Some(status)
    }

    pub fn is_not_found(&self) -> bool {
        self.has_status(NOT_FOUND)
    }

    pub fn is_unprocessable(&self) -> bool {
        self.has_status(UNPROCESSABLE_ENTITY)
    }

    pub fn is_forbidden(&self) -> bool {
        self.has_status(FORBIDDEN)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.has_status(UNAUTHORIZED)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api { status, .. } => {
                *status >= 500 || *status == TOO_MANY_REQUESTS || *status == GATEWAY_TIMEOUT
            }
            _ => false,
        }
    }

    pub fn should_show_toast(&self) -> bool {
        // validation is shown inline, 401 goes through the session
        !(self.is_validation_error() || self.is_unauthorized())
    }

    pub fn retry_delay(&self) -> Duration {
        let millis = match self {
            Self::Network { .. } => 2000,
            Self::Api { status, .. } if *status == TOO_MANY_REQUESTS => 5000,
            Self::Api { status, .. } if *status >= 500 => 3000,
            _ => 1000,
        };

        Duration::from_millis(millis)
    }

    pub fn should_refresh_after_error(&self) -> bool {
        self.is_not_found() || self.is_network_error()
    }
}
