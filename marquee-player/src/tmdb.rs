//! TMDB transport for the movies screen.

use async_trait::async_trait;
use marquee_config::{TmdbConfig, TmdbCredentials, TrendingWindow};
use marquee_core::{MovieCatalog, TransportError};
use marquee_model::MoviePage;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// TMDB v3 API client. Always requests the first page of a collection.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    credentials: Option<TmdbCredentials>,
    language: String,
    region: Option<String>,
    trending_window: TrendingWindow,
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

impl TmdbClient {
    pub fn new(
        config: &TmdbConfig,
        trending_window: TrendingWindow,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credentials: config.credentials.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
            trending_window,
        })
    }

    /// `{base}/{segments...}`, keeping any path already on the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::network(format!(
                    "{} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn first_page(&self, segments: &[&str]) -> Result<MoviePage, TransportError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "requesting catalog page");

        let mut request = self
            .client
            .get(url)
            .query(&[("language", self.language.as_str()), ("page", "1")]);
        if let Some(region) = &self.region {
            request = request.query(&[("region", region.as_str())]);
        }
        request = match &self.credentials {
            Some(TmdbCredentials::ApiKey(key)) => {
                request.query(&[("api_key", key.as_str())])
            }
            Some(TmdbCredentials::AccessToken(token)) => request.bearer_auth(token),
            None => request,
        };

        // Strip the URL from reqwest errors: it carries the api_key.
        let response = request
            .send()
            .await
            .map_err(|err| TransportError::network(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::network(err.without_url().to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::decode(err.to_string()))
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<TmdbErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.status_message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn now_playing(&self) -> Result<MoviePage, TransportError> {
        self.first_page(&["movie", "now_playing"]).await
    }

    async fn trending(&self) -> Result<MoviePage, TransportError> {
        self.first_page(&["trending", "movie", self.trending_window.as_str()])
            .await
    }

    async fn upcoming(&self) -> Result<MoviePage, TransportError> {
        self.first_page(&["movie", "upcoming"]).await
    }
}
