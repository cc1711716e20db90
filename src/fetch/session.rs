//! The HTTP session shared by the geocoding and archive clients.

use crate::fetch::cache::ResponseCache;
use crate::fetch::error::FetchError;
use crate::fetch::retry::RetryPolicy;
use bon::bon;
use log::{info, warn};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An HTTP client with an optional response cache and a retry policy.
///
/// Built once per run and handed to the clients that need network access.
///
/// # Examples
///
/// ```
/// use weather_trends::{HttpSession, RetryPolicy};
///
/// let session = HttpSession::builder()
///     .retry(RetryPolicy::new(2, 0.5))
///     .build()
///     .unwrap();
/// assert!(session.cache().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    cache: Option<ResponseCache>,
    retry: RetryPolicy,
}

#[bon]
impl HttpSession {
    #[builder]
    pub fn new(
        cache: Option<ResponseCache>,
        #[builder(default)] retry: RetryPolicy,
        #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))] timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather_trends/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            cache,
            retry,
        })
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Builds `base?query`. The resulting string is also the cache key.
    pub fn url(base: &str, query: &[(&str, String)]) -> Result<Url, FetchError> {
        Url::parse_with_params(base, query).map_err(|e| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
    }

    /// GETs `url` and parses the body as JSON, answering from the cache when possible.
    ///
    /// Only bodies that parse as `T` are stored. A cached body that no longer parses is
    /// discarded and fetched again.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let Some(cache) = &self.cache else {
            let body = self.fetch_with_retry(url).await?;
            return parse_json(url, &body);
        };

        if let Some(body) = cache.get(url.as_str()).await? {
            match parse_json(url, &body) {
                Ok(value) => {
                    info!("Cache hit for {}", url);
                    return Ok(value);
                }
                Err(e) => warn!("Discarding cached response for {}: {}", url, e),
            }
        }

        info!("Cache miss for {}. Downloading.", url);
        let body = self.fetch_with_retry(url).await?;
        let value = parse_json(url, &body)?;
        cache.put(url.as_str(), &body).await?;
        Ok(value)
    }

    /// Like [`HttpSession::get_json`], but always asks the server and never stores the
    /// response. For endpoints that report failures inside a successful response.
    pub async fn get_json_fresh<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let body = self.fetch_with_retry(url).await?;
        parse_json(url, &body)
    }

    async fn fetch_with_retry(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.retry.retries => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url, e, attempt, self.retry.retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() && attempt > 0 => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                        source: Box::new(e),
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| FetchError::ResponseBody(url.to_string(), e))
    }
}

fn parse_json<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::JsonParse {
        url: url.to_string(),
        source: e,
    })
}
