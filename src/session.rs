use crate::{
    api::KeygenApi,
    err::{AuthCode, Error},
    handling::handle_auth_error,
    models::User,
    Result,
};
use std::{
    fs::{create_dir_all, read_to_string, remove_file, File},
    io::Write,
    path::PathBuf,
    sync::Mutex,
};
use tracing::{debug, warn};

/// Key (and file name) the bearer token is persisted under.
pub const TOKEN_KEY: &str = "keygen_token";
pub const SESSION_TOKEN_NAME: &str = "Keygen Admin Session";

/// Where the session token survives restarts.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the token in `<dir>/keygen_token`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self) -> Result<PathBuf> {
        if !self.dir.exists() {
            create_dir_all(&self.dir)?;
        }

        Ok(self.dir.join(TOKEN_KEY))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.token_path()?;

        // no session yet
        if !path.exists() {
            return Ok(None);
        }

        let token = read_to_string(path)?;
        let token = token.trim();

        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        let path = self.token_path()?;

        let mut f = File::create(path)?;
        f.write_all(token.as_bytes())?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.token_path()?;

        if path.exists() {
            remove_file(path)?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    fn with_token<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> Result<T> {
        let mut token = self
            .token
            .lock()
            .map_err(|_| Error::App("Session store lock poisoned".into()))?;

        Ok(f(&mut token))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        self.with_token(|token| token.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        self.with_token(|current| *current = Some(token.to_string()))
    }

    fn clear(&self) -> Result<()> {
        self.with_token(|current| *current = None)
    }
}

/// Login state of the admin user, backed by a [`SessionStore`].
pub struct AuthSession {
    store: Box<dyn SessionStore>,
    user: Option<User>,
    last_error: Option<String>,
}

impl AuthSession {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            user: None,
            last_error: None,
        }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Picks up a persisted token and checks it against `/me`.
    pub async fn restore(&mut self, api: &mut KeygenApi) -> Result<Option<User>> {
        self.last_error = None;

        let Some(token) = self.store.load()? else {
            return Ok(None);
        };

        api.set_session(token);

        match api.me().await {
            Ok(res) => {
                self.user = res.data;
                Ok(self.user.clone())
            }
            Err(err) => {
                warn!(error = %err, "session check failed");

                // drop the invalid token
                if let Err(clear_err) = self.store.clear() {
                    warn!(error = %clear_err, "failed clearing session store");
                }
                api.clear_session();
                self.user = None;

                let err = if err.is_unauthorized() || err.is_forbidden() {
                    Error::auth(
                        AuthCode::TokenExpired,
                        err.status().unwrap_or_default(),
                        "Session expired - please log in again",
                    )
                } else {
                    err
                };

                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn login(
        &mut self,
        api: &mut KeygenApi,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.last_error = None;

        match self.try_login(api, email, password).await {
            Ok(user) => {
                debug!(authenticated = user.is_some(), "login finished");
                self.user = user;
                Ok(self.user.clone())
            }
            Err(err) => {
                let outcome = handle_auth_error(&err);
                self.last_error = outcome.toast;
                Err(err)
            }
        }
    }

    async fn try_login(
        &self,
        api: &mut KeygenApi,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let token = api
            .authenticate(email, password, Some(SESSION_TOKEN_NAME))
            .await
            .map_err(|err| match err {
                Error::Api { status: 401, .. } => Error::auth(
                    AuthCode::InvalidCredentials,
                    401,
                    err.combined_message(),
                ),
                err => err,
            })?;

        // step: persist
        self.store.save(&token)?;

        // step: who am I
        let res = api.me().await?;

        Ok(res.data)
    }

    pub fn logout(&mut self, api: &mut KeygenApi) -> Result<()> {
        self.user = None;
        self.last_error = None;
        api.clear_session();

        self.store.clear()
    }
}
