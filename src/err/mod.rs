pub mod classify;

pub use classify::ErrorKind;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}", combine_errors(.errors))]
    Api { status: u16, errors: Vec<ApiError> },
    #[error("Network Error: {detail}")]
    Network { code: NetworkCode, detail: String },
    #[error("{}: {detail}", .code.title())]
    Auth {
        code: AuthCode,
        status: u16,
        detail: String,
    },
    #[error("Validation Error: {detail}")]
    Validation {
        field: Option<String>,
        detail: String,
    },
    #[error("Parse Error: {detail}")]
    Parse { code: ParseCode, detail: String },
    #[error("{0}")]
    App(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Config Error: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            detail: detail.into(),
        }
    }

    pub fn auth(code: AuthCode, status: u16, detail: impl Into<String>) -> Self {
        Self::Auth {
            code,
            status,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // malformed request, never reached the wire
        if err.is_builder() {
            return Self::App(format!("Failed building request: {}", err));
        }

        let code = if err.is_timeout() {
            NetworkCode::Timeout
        } else if err.is_connect() {
            NetworkCode::ConnectionRefused
        } else {
            NetworkCode::NetworkError
        };

        Self::Network {
            code,
            detail: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            code: ParseCode::JsonError,
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkCode {
    NetworkError,
    Timeout,
    ConnectionRefused,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthCode {
    AuthFailed,
    TokenExpired,
    InvalidCredentials,
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseCode {
    ParseError,
    JsonError,
}

impl NetworkCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::ConnectionRefused => "CONNECTION_REFUSED",
            Self::Abort => "ABORT",
        }
    }
}

impl AuthCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::AuthFailed => "Authentication Failed",
            Self::TokenExpired => "Token Expired",
            Self::InvalidCredentials => "Invalid Credentials",
            Self::Unauthorized => "Unauthorized",
        }
    }
}

impl ParseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }
}

impl fmt::Display for NetworkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AuthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a JSON:API `errors` array.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ApiErrorSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ApiErrorSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl ApiError {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            ..Default::default()
        }
    }

    fn http(status_code: StatusCode) -> Self {
        Self::new(
            "HTTP Error",
            format!("Request failed with status {}", status_code.as_u16()),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
struct ApiErrors {
    errors: Option<Vec<ApiError>>,
}

pub(crate) fn combine_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.title, e.detail))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the API error for a non-2xx response from whatever body came back.
pub fn parse_err_json(status_code: StatusCode, body: Option<serde_json::Value>) -> Error {
    let errors = body
        .and_then(|body| serde_json::from_value::<ApiErrors>(body).ok())
        .and_then(|api_errs| api_errs.errors)
        .filter(|errs| !errs.is_empty())
        .unwrap_or_else(|| vec![ApiError::http(status_code)]);

    Error::Api {
        status: status_code.as_u16(),
        errors,
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorSummary {
    pub code: String,
    pub detail: String,
    pub status: Option<u16>,
    pub retryable: bool,
}

// to be sent back to js front-end
impl From<Error> for ErrorSummary {
    fn from(value: Error) -> Self {
        let status = value.status();
        let retryable = value.is_retryable();

        let (code, detail) = match value {
            Error::Api { errors, .. } => {
                let code = errors
                    .first()
                    .and_then(|e| e.code.clone())
                    .unwrap_or_else(|| "API_ERROR".into());

                (code, combine_errors(&errors))
            }
            Error::Network { code, detail } => (code.as_str().into(), detail),
            Error::Auth { code, detail, .. } => (code.as_str().into(), detail),
            Error::Validation { detail, .. } => ("VALIDATION_ERROR".into(), detail),
            Error::Parse { code, detail } => (code.as_str().into(), detail),
            Error::App(detail) => ("APP_ERROR".into(), detail),
            Error::Io(err) => ("APP_ERROR".into(), err.to_string()),
            Error::Config(detail) => ("CONFIG_ERROR".into(), detail),
        };

        Self {
            code,
            detail,
            status,
            retryable,
        }
    }
}
