//! ContribScout - open source project recommendations with LLM analysis.
//!
//! The [`Aggregator`] searches GitHub for repositories matching a
//! technology stack and interest area, then uses an LLM backend to shorten
//! descriptions, summarize READMEs, analyze project culture, draft
//! contribution guidelines and translate text.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use contribscout::{Aggregator, ChatClient, ChatConfig, GitHubClient, GitHubConfig, TemplateStore};
//!
//! let search = GitHubClient::new(GitHubConfig::default())?;
//! let llm = ChatClient::new(ChatConfig::default())?;
//! let aggregator = Aggregator::new(search, llm, TemplateStore::builtin());
//!
//! for project in aggregator.get_recommended_projects("rust", "web development").await? {
//!     println!("{} ({} stars): {}", project.name, project.stars, project.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod models;
pub mod report;
pub mod templates;

pub use analysis::Aggregator;
pub use error::{AggregatorError, LlmError, SearchError, TemplateError};
pub use github::{GitHubClient, GitHubConfig, RepositorySearch};
pub use llm::{ChatClient, ChatConfig, CompletionBackend};
pub use models::{Generated, Readme, RepositorySummary, SearchCriteria};
pub use templates::{LoadMode, MarkerStyle, PromptContext, TemplateName, TemplateStore};
