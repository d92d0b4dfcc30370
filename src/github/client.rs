//! GitHub REST API client.

use super::{RepositorySearch, SearchQuery};
use crate::error::SearchError;
use crate::models::RepositoryRecord;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    /// Personal access token; anonymous requests when `None`.
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    items: Vec<RepositoryRecord>,
}

pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, SearchError> {
        info!(
            "Initializing GitHub client for {} ({})",
            config.api_url,
            if config.token.is_some() {
                "authenticated"
            } else {
                "anonymous"
            }
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|source| SearchError::Request {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        let request = self
            .http_client
            .get(url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, concat!("contribscout/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", "2022-11-28");

        match self.config.token {
            Some(ref token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<reqwest::Response, SearchError> {
        let response = request.send().await.map_err(|source| SearchError::Request {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search_repositories(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RepositoryRecord>, SearchError> {
        let url = self.endpoint("search/repositories");
        debug!("Searching repositories: {:?}", query);

        let request = self.get(&url, "application/vnd.github+json").query(&[
            ("q", query.q.clone()),
            ("sort", query.sort.to_string()),
            ("order", query.order.to_string()),
            ("per_page", query.per_page.to_string()),
        ]);

        let response = self.send(&url, request).await?;
        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        info!(
            "Search matched {} repositories, received {}",
            search.total_count,
            search.items.len()
        );

        Ok(search.items)
    }

    async fn fetch_readme(&self, full_name: &str) -> Result<String, SearchError> {
        let url = self.endpoint(&format!("repos/{}/readme", full_name));
        debug!("Fetching README for {}", full_name);

        let request = self.get(&url, "application/vnd.github.raw");
        let response = self.send(&url, request).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        String::from_utf8(body.to_vec())
            .map_err(|e| SearchError::Decode(format!("README of {} is not UTF-8: {}", full_name, e)))
    }
}
