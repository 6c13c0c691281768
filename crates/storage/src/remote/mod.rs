use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::repository::{
    CardLogRepository, CardRepository, ReviewQueueRepository, Storage, StorageError,
};

mod card_repo;
mod log_repo;
mod mapping;
mod review_queue_repo;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const API_URL_ENV: &str = "DECKS_API_URL";
pub const API_TOKEN_ENV: &str = "DECKS_API_TOKEN";
pub const API_TIMEOUT_ENV: &str = "DECKS_API_TIMEOUT_SECS";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteInitError {
    #[error("invalid API url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API url {0:?} cannot carry path segments")]
    NotABase(String),

    #[error("invalid timeout {0:?}, expected whole seconds")]
    InvalidTimeout(String),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Where the collaboration API lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Build a config for the given base url with no token.
    ///
    /// A trailing slash is added so relative joins stay under the base path.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if `raw` is not an absolute http(s) url.
    pub fn new(raw: &str) -> Result<Self, RemoteInitError> {
        let trimmed = raw.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized).map_err(|source| RemoteInitError::InvalidBaseUrl {
            raw: raw.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteInitError::NotABase(raw.to_string()));
        }
        Ok(Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `DECKS_API_URL`, `DECKS_API_TOKEN` and `DECKS_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if the url or timeout cannot be parsed.
    pub fn from_env() -> Result<Self, RemoteInitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RemoteInitError> {
        let url = lookup(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&url)?.with_token(lookup(API_TOKEN_ENV));
        if let Some(raw) = lookup(API_TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| RemoteInitError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// HTTP client for the collaboration API.
#[derive(Clone)]
pub struct RemoteRepository {
    client: Client,
    config: Arc<RemoteConfig>,
}

impl RemoteRepository {
    /// Build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if the TLS backend cannot be initialised.
    pub fn connect(config: RemoteConfig) -> Result<Self, RemoteInitError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Base url extended by path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::Connection("API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body, mapping failures to `StorageError`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, StorageError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| StorageError::Serialization(e.to_string()));
        }
        let message = response
            .json::<mapping::MessageDto>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());
        log::warn!("collaboration API answered {status}");
        Err(status_error(status, message))
    }
}

fn status_error(status: StatusCode, message: Option<String>) -> StorageError {
    match (status, message) {
        (StatusCode::UNAUTHORIZED, None) => StorageError::Unauthorized,
        (StatusCode::NOT_FOUND, None) => StorageError::NotFound,
        (StatusCode::CONFLICT, None) => StorageError::Conflict,
        (_, Some(message)) => StorageError::Rejected {
            status: status.as_u16(),
            message,
        },
        (_, None) => StorageError::Http {
            status: status.as_u16(),
        },
    }
}

impl Storage {
    /// Build a `Storage` backed by the collaboration API.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if the HTTP client cannot be built.
    pub fn remote(config: RemoteConfig) -> Result<Self, RemoteInitError> {
        let repo = RemoteRepository::connect(config)?;
        let cards: Arc<dyn CardRepository> = Arc::new(repo.clone());
        let logs: Arc<dyn CardLogRepository> = Arc::new(repo.clone());
        let review_queue: Arc<dyn ReviewQueueRepository> = Arc::new(repo);
        Ok(Self {
            cards,
            logs,
            review_queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RemoteRepository>();
    }

    #[test]
    fn config_defaults_and_overrides() {
        let config = RemoteConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let config = RemoteConfig::from_lookup(|key| match key {
            API_URL_ENV => Some("https://decks.example/api".into()),
            API_TOKEN_ENV => Some("secret".into()),
            API_TIMEOUT_ENV => Some("3".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://decks.example/api/");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = RemoteConfig::from_lookup(|key| {
            (key == API_TIMEOUT_ENV).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, RemoteInitError::InvalidTimeout(_)));
    }

    #[test]
    fn endpoint_encodes_segments() {
        let repo = RemoteRepository::connect(RemoteConfig::new("http://host/api").unwrap()).unwrap();
        let url = repo.endpoint(&["cards", "a b", "logs"]).unwrap();
        assert_eq!(url.as_str(), "http://host/api/cards/a%20b/logs");
    }

    #[test]
    fn status_mapping_prefers_server_message() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None),
            StorageError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, None),
            StorageError::NotFound
        ));
        let err = status_error(StatusCode::FORBIDDEN, Some("Only the owner can decide".into()));
        assert_eq!(err.server_message(), Some("Only the owner can decide"));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, None),
            StorageError::Http { status: 502 }
        ));
    }
}
