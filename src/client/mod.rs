pub mod document;
pub mod params;

pub use document::*;
pub use params::{pagination, ParamValue, Params};

use crate::{
    err::{parse_err_json, AuthCode, Error, ParseCode},
    models::User,
    Result,
};
use base64::Engine;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const JSON_API: &str = "application/vnd.api+json";
pub const DEFAULT_API_URL: &str = "https://api.keygen.sh/v1";
pub const DEFAULT_TOKEN_NAME: &str = "Keygen Admin Token";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub params: Params,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::method(Method::POST)
    }

    pub fn patch() -> Self {
        Self::method(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::method(Method::DELETE)
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug)]
pub struct KeygenClient {
    account_id: String,
    api_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl KeygenClient {
    pub fn new(
        account_id: String,
        api_url: String,
        user_agent: String,
        timeout: Duration,
    ) -> Self {
        // default client with user_agent
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self {
            account_id,
            api_url: api_url.trim_end_matches('/').into(),
            token: None,
            http_client,
            timeout,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// An empty token clears the session.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn build_url(&self, endpoint: &str, params: &Params) -> Result<Url> {
        let base_url = format!("{}/accounts/{}", self.api_url, self.account_id);

        let full_url = if let Some(rest) = endpoint.strip_prefix("/v1") {
            // links handed back by the api already carry the version prefix
            match self.api_url.strip_suffix("/v1") {
                Some(root) => format!("{}/v1{}", root, rest),
                None => format!("{}{}", self.api_url, endpoint),
            }
        } else if endpoint == "/me" {
            format!("{}{}", self.api_url, endpoint)
        } else if endpoint.starts_with('/') {
            format!("{}{}", base_url, endpoint)
        } else {
            format!("{}/{}", base_url, endpoint)
        };

        let mut url = Url::parse(&full_url).map_err(|_| Error::Parse {
            code: ParseCode::ParseError,
            detail: format!("Failed parsing url: {}", full_url),
        })?;

        // query params
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.to_pairs());
        }

        Ok(url)
    }

    fn headers(&self, overrides: &[(String, String)]) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

        if let Some(token) = &self.token {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::validation("token", "Token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        // explicit headers win over the defaults
        for (name, value) in overrides {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::validation("headers", format!("Invalid header name: {}", name)))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                Error::validation("headers", format!("Invalid value for header: {}", name))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Sends one request and returns the parsed body, `None` when it was empty or not json.
    pub async fn request_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<serde_json::Value>> {
        let url = self.build_url(endpoint, &options.params)?;
        let headers = self.headers(&options.headers)?;
        let method = options.method;

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .timeout(self.timeout)
            .headers(headers);

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        debug!(%method, %url, "sending keygen request");
        let response = request.send().await?;

        let status = response.status();
        let res_text = response.text().await?;
        let body = parse_body(&res_text);
        debug!(%method, %url, status = status.as_u16(), "received keygen response");

        if !status.is_success() {
            return Err(parse_err_json(status, body));
        }

        // DELETE usually answers with an empty body
        if body.is_none() && !res_text.trim().is_empty() && method != Method::DELETE {
            warn!(%method, %url, "could not parse json response of a successful request");
        }

        Ok(body)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Document<T>> {
        match self.request_raw(endpoint, options).await? {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Ok(Document::default()),
        }
    }

    /// Exchanges email/password for a bearer token and keeps it for later requests.
    pub async fn authenticate(
        &mut self,
        email: &str,
        password: &str,
        token_name: &str,
    ) -> Result<String> {
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", email, password));
        let body = serde_json::json!({
            "data": {
                "type": "tokens",
                "attributes": {
                    "name": token_name
                }
            }
        });

        let options = RequestOptions::post()
            .header(AUTHORIZATION.as_str(), format!("Basic {}", credentials))
            .json(&body)?;

        let response = self.request_raw("/tokens", options).await?;

        let token = response
            .as_ref()
            .and_then(|res| res.pointer("/data/attributes/token"))
            .and_then(|token| token.as_str())
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::auth(
                    AuthCode::AuthFailed,
                    401,
                    "Failed to retrieve token from authentication response",
                )
            })?;

        self.set_token(token.clone());

        Ok(token)
    }

    /// Who am I?
    pub async fn me(&self) -> Result<Document<User>> {
        self.request("/me", RequestOptions::get()).await
    }
}

fn parse_body(res_text: &str) -> Option<serde_json::Value> {
    if res_text.trim().is_empty() {
        return None;
    }

    serde_json::from_str::<serde_json::Value>(res_text)
        .ok()
        .filter(|body| !body.is_null())
}
