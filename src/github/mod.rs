//! Repository-search backend.
//!
//! [`RepositorySearch`] is what the aggregator consumes; [`GitHubClient`]
//! implements it against the GitHub REST API.

pub mod client;

pub use client::{GitHubClient, GitHubConfig};

use crate::error::SearchError;
use crate::models::RepositoryRecord;
use async_trait::async_trait;
use std::fmt;

/// Field search results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Stars,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Stars => write!(f, "stars"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// A repository search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub sort: SortKey,
    pub order: SortOrder,
    /// How many results the backend should return at most.
    pub per_page: u32,
}

impl SearchQuery {
    /// Most-starred first.
    pub fn by_stars(q: impl Into<String>, per_page: u32) -> Self {
        Self {
            q: q.into(),
            sort: SortKey::Stars,
            order: SortOrder::Desc,
            per_page,
        }
    }
}

/// Remote search and README retrieval over hosted repositories.
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    /// Run a search; results come back in the backend's sort order.
    async fn search_repositories(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RepositoryRecord>, SearchError>;

    /// Fetch the decoded README of `owner/name`.
    async fn fetch_readme(&self, full_name: &str) -> Result<String, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_stars_defaults() {
        let query = SearchQuery::by_stars("cli language:rust in:description", 5);
        assert_eq!(query.sort.to_string(), "stars");
        assert_eq!(query.order.to_string(), "desc");
        assert_eq!(query.per_page, 5);
    }
}
