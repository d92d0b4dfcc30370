//! Data models for project recommendations.
//!
//! These are request-scoped values: built once per call, handed back to the
//! caller, never retained by the library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a repository has no description.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Placeholder rendered when a README could not be fetched.
pub const NO_README: &str = "No README available.";

/// What the user is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Primary language, e.g. `rust`.
    pub tech_stack: String,
    /// Free-text interest area, e.g. `web development`.
    pub interest_areas: String,
}

impl SearchCriteria {
    pub fn new(tech_stack: impl Into<String>, interest_areas: impl Into<String>) -> Self {
        Self {
            tech_stack: tech_stack.into(),
            interest_areas: interest_areas.into(),
        }
    }

    /// Build the repository search query string.
    pub fn query(&self) -> String {
        format!(
            "{} language:{} in:description",
            self.interest_areas, self.tech_stack
        )
    }
}

/// A single repository as yielded by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub stargazers_count: u64,
}

/// README text attached to a summary, or the fact that it was not available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Readme {
    Fetched(String),
    Unavailable,
}

impl Readme {
    /// The README text, or the fixed placeholder when unavailable.
    pub fn as_str(&self) -> &str {
        match self {
            Readme::Fetched(text) => text,
            Readme::Unavailable => NO_README,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Readme::Fetched(_))
    }
}

impl fmt::Display for Readme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Readme> for String {
    fn from(readme: Readme) -> Self {
        match readme {
            Readme::Fetched(text) => text,
            Readme::Unavailable => NO_README.to_string(),
        }
    }
}

/// A recommended repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    /// `owner/name`.
    pub name: String,
    /// Description, shortened by the LLM when it was too long.
    pub description: String,
    pub url: String,
    pub forks: u64,
    pub stars: u64,
    pub readme: Readme,
}

/// Which masking operation produced a [`Generated`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Summarization,
    Translation,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Summarization => write!(f, "summarization"),
            Operation::Translation => write!(f, "translation"),
        }
    }
}

/// Output of an LLM call whose failures are reported in-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Generated {
    Text { text: String },
    Failed { operation: Operation, message: String },
}

impl Generated {
    pub fn is_failed(&self) -> bool {
        matches!(self, Generated::Failed { .. })
    }

    /// Flatten into plain text; failures become `Error during <operation>: <message>`.
    pub fn into_text(self) -> String {
        match self {
            Generated::Text { text } => text,
            failed => failed.to_string(),
        }
    }
}

impl fmt::Display for Generated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generated::Text { text } => f.write_str(text),
            Generated::Failed { operation, message } => {
                write!(f, "Error during {}: {}", operation, message)
            }
        }
    }
}

/// Everything gathered for one project in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: RepositorySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture_analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
}

impl ProjectReport {
    pub fn new(project: RepositorySummary) -> Self {
        Self {
            project,
            readme_summary: None,
            culture_analysis: None,
            guidelines: None,
            translation: None,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.culture_analysis.is_some()
    }
}

/// Translated description (and README summary when one was produced).
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub language: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_summary: Option<String>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub criteria: SearchCriteria,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
    pub project_count: usize,
    pub duration_seconds: f64,
}

/// The complete recommendations report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub projects: Vec<ProjectReport>,
}

impl Report {
    /// Number of projects with a culture analysis attached.
    pub fn analyzed_count(&self) -> usize {
        self.projects.iter().filter(|p| p.is_analyzed()).count()
    }
}
