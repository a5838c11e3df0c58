use crate::{
    client::{Document, KeygenClient, DEFAULT_TOKEN_NAME},
    models::User,
    resources::*,
    session::SessionStore,
    Builder, Config, Result,
};
use tracing::debug;

/// Entry point for every admin operation. Construct once and pass it around.
#[derive(Debug)]
pub struct KeygenApi {
    client: KeygenClient,
}

impl KeygenApi {
    pub fn new(client: KeygenClient) -> Self {
        Self { client }
    }

    /// Builds the api from `KEYGEN_API_URL`, `KEYGEN_ACCOUNT_ID` and optionally `KEYGEN_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;

        Ok(Builder::from(config).build_api())
    }

    pub fn client(&self) -> &KeygenClient {
        &self.client
    }

    pub fn licenses(&self) -> LicenseResource<'_> {
        LicenseResource::new(&self.client)
    }

    pub fn machines(&self) -> MachineResource<'_> {
        MachineResource::new(&self.client)
    }

    pub fn users(&self) -> UserResource<'_> {
        UserResource::new(&self.client)
    }

    pub fn policies(&self) -> PolicyResource<'_> {
        PolicyResource::new(&self.client)
    }

    pub fn products(&self) -> ProductResource<'_> {
        ProductResource::new(&self.client)
    }

    pub fn groups(&self) -> GroupResource<'_> {
        GroupResource::new(&self.client)
    }

    pub fn entitlements(&self) -> EntitlementResource<'_> {
        EntitlementResource::new(&self.client)
    }

    pub fn request_logs(&self) -> RequestLogResource<'_> {
        RequestLogResource::new(&self.client)
    }

    pub fn webhooks(&self) -> WebhookResource<'_> {
        WebhookResource::new(&self.client)
    }

    /// Issues a token for the credentials and keeps it as the current session.
    pub async fn authenticate(
        &mut self,
        email: &str,
        password: &str,
        token_name: Option<&str>,
    ) -> Result<String> {
        self.client
            .authenticate(email, password, token_name.unwrap_or(DEFAULT_TOKEN_NAME))
            .await
    }

    pub async fn me(&self) -> Result<Document<User>> {
        self.client.me().await
    }

    pub fn token(&self) -> Option<&str> {
        self.client.token()
    }

    pub fn set_session(&mut self, token: impl Into<String>) {
        self.client.set_token(token);
    }

    pub fn clear_session(&mut self) {
        self.client.clear_token();
    }

    /// Re-reads the persisted token and adopts it when it differs from the current one.
    pub fn sync_session(&mut self, store: &dyn SessionStore) -> Result<bool> {
        let stored = store.load()?;

        if stored.as_deref() == self.client.token() {
            return Ok(false);
        }

        debug!(present = stored.is_some(), "persisted session token changed");
        match stored {
            Some(token) => self.client.set_token(token),
            None => self.client.clear_token(),
        }

        Ok(true)
    }
}
