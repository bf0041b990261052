//! TMDB (The Movie Database) v3 API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cinelist_config::TmdbConfig;
use cinelist_models::{Category, PagedResponse, Title, TitleDetails, TitleKind};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CatalogError;
use crate::traits::CatalogSource;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required (set tmdb.api_key or CINELIST_TMDB_API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.url(path);
        debug!("TMDB GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, path, body));
        }

        let body = response.text().await?;
        parse_body(path, &body)
    }
}

/// Maps a non-success status to the matching error
fn status_error(status: StatusCode, resource: &str, body: String) -> CatalogError {
    match status {
        StatusCode::UNAUTHORIZED => CatalogError::NotConfigured("Invalid TMDB API key".to_string()),
        StatusCode::NOT_FOUND => CatalogError::NotFound(resource.to_string()),
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimitExceeded,
        _ => CatalogError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

fn parse_body<T: DeserializeOwned>(resource: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        CatalogError::Parse(format!("Failed to parse {} response: {}", resource, e))
    })
}

/// Multi-search also returns people; only movies and series are kept
fn keep_titles(results: Vec<Title>) -> Vec<Title> {
    results.into_iter().filter(|t| t.kind().is_some()).collect()
}

fn details_path(id: u64, kind: TitleKind) -> String {
    format!("{}/{}", kind.as_str(), id)
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Title>, CatalogError> {
        let page: PagedResponse<Title> = self.get_json(category.endpoint(), &[]).await?;
        debug!("TMDB {}: {} results", category, page.results.len());
        Ok(page.results)
    }

    async fn get_details(&self, id: u64, kind: TitleKind) -> Result<TitleDetails, CatalogError> {
        self.get_json(&details_path(id, kind), &[("append_to_response", "credits")])
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError> {
        let page: PagedResponse<Title> = self
            .get_json("search/multi", &[("query", query), ("include_adult", "false")])
            .await?;
        debug!("TMDB search '{}': {} results", query, page.results.len());
        Ok(keep_titles(page.results))
    }
}
