use crate::config::ApiConfig;
use crate::internal::models::{ApiJoke, JokeCollection};
use anyhow::Context;
use reqwest::Client;
use std::time::Instant;
use thiserror::Error;

const API_KEY_HEADER: &str = "X-Api-Key";
const DAD_JOKES_PATH: &str = "dadjokes";

/// The only failure the fetcher reports. Network, HTTP status and JSON
/// errors are deliberately not distinguished; the chain is kept for logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch a dad joke: {0:#}")]
    NetworkOrParseFailure(#[source] anyhow::Error),
}

/// Callbacks a caller receives around a single fetch.
pub trait FetchObserver {
    fn loading_started(&self);
    fn loading_ended(&self);
    fn failed(&self, _error: &FetchError) {}
}

/// Observer that ignores every signal.
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn loading_started(&self) {}
    fn loading_ended(&self) {}
}

/// Signals `loading_started` on creation and `loading_ended` on drop, so the
/// end signal fires once on every exit path, including a dropped future.
struct LoadingGuard<'a, O: FetchObserver + ?Sized> {
    observer: &'a O,
    started: Instant,
}

impl<'a, O: FetchObserver + ?Sized> LoadingGuard<'a, O> {
    fn acquire(observer: &'a O) -> Self {
        observer.loading_started();
        Self {
            observer,
            started: Instant::now(),
        }
    }
}

impl<O: FetchObserver + ?Sized> Drop for LoadingGuard<'_, O> {
    fn drop(&mut self) {
        tracing::debug!(elapsed = ?self.started.elapsed(), "fetch.loading_ended");
        self.observer.loading_ended();
    }
}

/// HTTP client for the dad joke endpoint.
///
/// Cookies are kept in a per-client store so credentials set by the API are
/// sent back on later requests.
#[derive(Clone)]
pub struct JokeService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JokeService {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), DAD_JOKES_PATH)
    }

    /// Fetch one batch of jokes, reporting failures as `FetchError`.
    #[tracing::instrument(skip(self), fields(url = %self.endpoint()))]
    pub async fn fetch_jokes(&self) -> Result<JokeCollection, FetchError> {
        let url = self.endpoint();
        self.get_jokes(&url)
            .await
            .map_err(FetchError::NetworkOrParseFailure)
    }

    /// Fetch with loading signals and a degraded result: on any failure the
    /// observer is told and an empty collection is returned.
    pub async fn fetch_random_joke<O>(&self, observer: &O) -> JokeCollection
    where
        O: FetchObserver + ?Sized,
    {
        let _loading = LoadingGuard::acquire(observer);

        match self.fetch_jokes().await {
            Ok(jokes) => {
                tracing::info!(count = jokes.len(), "Fetched dad jokes");
                jokes
            }
            Err(e) => {
                tracing::error!("{}", e);
                observer.failed(&e);
                JokeCollection::empty()
            }
        }
    }

    async fn get_jokes(&self, url: &str) -> anyhow::Result<JokeCollection> {
        let resp = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?
            .error_for_status()
            .with_context(|| format!("unexpected HTTP status from {}", url))?;

        let jokes = resp
            .json::<Vec<ApiJoke>>()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))?;

        Ok(JokeCollection::from(jokes))
    }
}
