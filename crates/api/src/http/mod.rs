use std::env;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::ports::{Api, ApiError};

mod auth;
mod decks;
mod envelope;
mod study;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const USER_AGENT: &str = concat!("neuroflash-study/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiConfigError {
    #[error("invalid API URL {raw:?}: {reason}")]
    InvalidUrl { raw: String, reason: String },

    #[error("API URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// Where the server lives and how the client identifies itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    user_agent: String,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ApiConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ApiConfigError> {
        let raw = base_url.trim();
        let mut url = Url::parse(raw).map_err(|e| ApiConfigError::InvalidUrl {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        // Endpoints are joined relative to the base, which needs a trailing slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Reads `NEUROFLASH_API_URL`, falling back to the local development server.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        match env::var("NEUROFLASH_API_URL") {
            Ok(value) if !value.trim().is_empty() => Self::new(&value),
            _ => {
                debug!("NEUROFLASH_API_URL not set, using {DEFAULT_API_URL}");
                Self::new(DEFAULT_API_URL)
            }
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("bad endpoint {path}: {e}")))
    }
}

/// reqwest-backed implementation of every API port.
///
/// The client keeps the server's session cookie, so a successful `login`
/// authenticates every later call made through the same value (or its clones).
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn into_api(self) -> Api {
        Api::from_shared(self)
    }

    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path)?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;
        read_envelope(response).await
    }

    async fn post_json_envelope<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_envelope(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    warn!(error = %err, "request failed");
    ApiError::Transport(err.to_string())
}

/// Map a response onto the `{success, errors?, ...}` convention used by the
/// server and decode the payload on success.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let text = response.text().await.map_err(transport_error)?;
    envelope::decode(status.as_u16(), status.is_success(), &text)
}
