pub mod api;
pub mod client;
#[cfg(feature = "plugin")]
mod commands;
pub mod err;
pub mod handling;
pub mod models;
pub mod resources;
pub mod session;

pub use api::KeygenApi;
pub use client::{KeygenClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use err::{Error, ErrorKind, ErrorSummary};
pub use session::{AuthSession, FileSessionStore, MemorySessionStore, SessionStore};

use std::time::Duration;

#[cfg(feature = "plugin")]
use tauri::{
    plugin::{Builder as PluginBuilder, TauriPlugin},
    Manager, Runtime,
};
#[cfg(feature = "plugin")]
use tokio::sync::Mutex;

pub type Result<T> = std::result::Result<T, Error>;

pub const API_URL_VAR: &str = "KEYGEN_API_URL";
pub const ACCOUNT_ID_VAR: &str = "KEYGEN_ACCOUNT_ID";
pub const TOKEN_VAR: &str = "KEYGEN_TOKEN";

/// Connection settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub account_id: String,
    pub token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", name)))
        };

        Ok(Self {
            api_url: required(API_URL_VAR)?,
            account_id: required(ACCOUNT_ID_VAR)?,
            token: lookup(TOKEN_VAR).filter(|token| !token.trim().is_empty()),
        })
    }
}

#[derive(Clone)]
pub struct Builder {
    pub account_id: String,
    pub api_url: String,
    pub token: Option<String>,
    pub user_agent: Option<String>,
    pub timeout: Duration,
}

impl Builder {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            api_url: DEFAULT_API_URL.into(),
            token: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        self
    }

    pub fn build_api(self) -> KeygenApi {
        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);

        let mut client = KeygenClient::new(self.account_id, self.api_url, user_agent, self.timeout);
        if let Some(token) = self.token {
            client.set_token(token);
        }

        KeygenApi::new(client)
    }

    #[cfg(feature = "plugin")]
    pub fn build<R: Runtime>(self) -> TauriPlugin<R> {
        PluginBuilder::new("keygen-admin")
            .invoke_handler(tauri::generate_handler![
                commands::login,
                commands::logout,
                commands::restore_session,
                commands::current_user,
                commands::list_licenses,
                commands::suspend_license,
                commands::reinstate_license,
                commands::renew_license,
                commands::delete_license,
                commands::deactivate_machine,
                commands::webhook_events,
            ])
            .setup(move |app| {
                // session token lives next to the app data
                let session_dir = app
                    .path_resolver()
                    .app_data_dir()
                    .map(|dir| dir.join("keygen"))
                    .ok_or_else(|| Error::Config("Can't resolve app data dir".into()))?;

                // init state
                app.manage(Mutex::new(self.build_api()));
                app.manage(Mutex::new(AuthSession::new(FileSessionStore::new(
                    session_dir,
                ))));

                Ok(())
            })
            .build()
    }
}

impl From<Config> for Builder {
    fn from(config: Config) -> Self {
        let builder = Builder::new(config.account_id).api_url(config.api_url);

        match config.token {
            Some(token) => builder.token(token),
            None => builder,
        }
    }
}

fn default_user_agent() -> String {
    // platform
    let os_name = format!("{}", whoami::platform());
    let os_version = whoami::distro();
    let arch = format!("{}", whoami::arch());

    format!(
        "{}/{} ({}; {}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        os_name,
        os_version,
        arch
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |name| vars.get(name).cloned()
    }

    #[test]
    fn config_requires_url_and_account() {
        let err = Config::from_lookup(lookup(&[(ACCOUNT_ID_VAR, "acct")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref detail) if detail.contains(API_URL_VAR)));

        let err = Config::from_lookup(lookup(&[(API_URL_VAR, "https://api.keygen.sh/v1")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref detail) if detail.contains(ACCOUNT_ID_VAR)));
    }

    #[test]
    fn config_token_is_optional() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.keygen.sh/v1"),
            (ACCOUNT_ID_VAR, "acct"),
        ]))
        .unwrap();
        assert_eq!(config.token, None);

        let api = Builder::from(Config {
            token: Some("tok_env".into()),
            ..config
        })
        .build_api();
        assert_eq!(api.token(), Some("tok_env"));
        assert_eq!(api.client().account_id(), "acct");
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let builder = Builder::new("acct").timeout(Duration::ZERO);
        assert_eq!(builder.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(default_user_agent().starts_with("keygen-admin/"));
    }
}
