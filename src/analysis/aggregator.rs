//! Recommendation and analysis orchestration.
//!
//! Every operation is a straight line: optional truncation, optional
//! template render, one awaited remote call, trim. Calls are never issued
//! concurrently.

use crate::error::Result;
use crate::github::{RepositorySearch, SearchQuery};
use crate::llm::CompletionBackend;
use crate::models::{
    Generated, Operation, Readme, RepositoryRecord, RepositorySummary, SearchCriteria,
    NO_DESCRIPTION,
};
use crate::templates::{PromptContext, TemplateName, TemplateStore};
use tracing::{debug, info};

/// Maximum number of recommendations returned per search.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Descriptions longer than this many characters are shortened.
pub const DESCRIPTION_LIMIT: usize = 180;

/// Target length handed to the description prompt.
pub const DESCRIPTION_TARGET: usize = 170;

/// Input cap for [`Aggregator::summarize_text`].
pub const SUMMARY_INPUT_CHARS: usize = 10_000;

/// Default word budget for [`Aggregator::summarize_text`].
pub const SUMMARY_MAX_WORDS: usize = 500;

/// Orchestrates the search backend, the LLM backend and the prompt templates.
pub struct Aggregator<S, L> {
    search: S,
    llm: L,
    templates: TemplateStore,
}

impl<S, L> Aggregator<S, L>
where
    S: RepositorySearch,
    L: CompletionBackend,
{
    pub fn new(search: S, llm: L, templates: TemplateStore) -> Self {
        Self {
            search,
            llm,
            templates,
        }
    }

    pub fn search_backend(&self) -> &S {
        &self.search
    }

    pub fn llm_backend(&self) -> &L {
        &self.llm
    }

    /// Shorten `text` to roughly `max_length` characters using the description template.
    ///
    /// Failures are reported in-band as [`Generated::Failed`].
    pub async fn summarize_with_template(&self, text: &str, max_length: usize) -> Generated {
        let ctx = PromptContext::new()
            .with("max_length", max_length)
            .with("text", text);

        let result = match self.templates.render(TemplateName::Description, &ctx) {
            Ok(prompt) => self.llm.complete(&prompt).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(response) => Generated::Text {
                text: response.trim().to_string(),
            },
            Err(message) => {
                debug!("Description summarization failed: {}", message);
                Generated::Failed {
                    operation: Operation::Summarization,
                    message,
                }
            }
        }
    }

    /// Search for repositories matching the criteria and build up to
    /// [`MAX_RECOMMENDATIONS`] summaries, most-starred first.
    pub async fn get_recommended_projects(
        &self,
        tech_stack: &str,
        interest_areas: &str,
    ) -> Result<Vec<RepositorySummary>> {
        let criteria = SearchCriteria::new(tech_stack, interest_areas);
        let query = SearchQuery::by_stars(criteria.query(), MAX_RECOMMENDATIONS as u32);
        info!("Searching repositories: {}", query.q);

        let records = self.search.search_repositories(&query).await?;

        let mut projects = Vec::with_capacity(MAX_RECOMMENDATIONS);
        for record in records.into_iter().take(MAX_RECOMMENDATIONS) {
            projects.push(self.summarize_record(record).await);
        }

        info!("Collected {} recommended projects", projects.len());
        Ok(projects)
    }

    async fn summarize_record(&self, record: RepositoryRecord) -> RepositorySummary {
        let readme = match self.search.fetch_readme(&record.full_name).await {
            Ok(text) => Readme::Fetched(text),
            Err(e) => {
                debug!("No README for {}: {}", record.full_name, e);
                Readme::Unavailable
            }
        };

        let mut description = record
            .description
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        if description.chars().count() > DESCRIPTION_LIMIT {
            debug!("Shortening description of {}", record.full_name);
            description = self
                .summarize_with_template(&description, DESCRIPTION_TARGET)
                .await
                .into_text();
        }

        RepositorySummary {
            name: record.full_name,
            description,
            url: record.html_url,
            forks: record.forks_count,
            stars: record.stargazers_count,
            readme,
        }
    }

    /// Describe a project's culture from its README.
    pub async fn analyze_project_culture(
        &self,
        repo_name: &str,
        readme_contents: &str,
    ) -> Result<String> {
        info!("Analyzing culture for {}", repo_name);
        let summarized_readme = self
            .summarize_text(readme_contents, SUMMARY_MAX_WORDS)
            .await?;

        let ctx = PromptContext::new()
            .with("repo_name", repo_name)
            .with("readme", summarized_readme);
        let prompt = self.templates.render(TemplateName::CultureAnalysis, &ctx)?;

        let analysis = self.llm.complete(&prompt).await?;
        Ok(analysis.trim().to_string())
    }

    /// Write newcomer contribution guidelines for a project.
    pub async fn generate_contribution_guidelines(&self, repo_name: &str) -> Result<String> {
        info!("Generating contribution guidelines for {}", repo_name);
        let ctx = PromptContext::new().with("repo_name", repo_name);
        let prompt = self
            .templates
            .render(TemplateName::ContributionGuidelines, &ctx)?;

        let guidelines = self.llm.complete(&prompt).await?;
        Ok(guidelines.trim().to_string())
    }

    /// Summarize the first [`SUMMARY_INPUT_CHARS`] characters of `text`.
    pub async fn summarize_text(&self, text: &str, max_tokens: usize) -> Result<String> {
        let text = truncate_chars(text, SUMMARY_INPUT_CHARS);
        let prompt = format!(
            "Please provide a concise summary (max {} words) of the following text:\n\n{}",
            max_tokens, text
        );

        let summary = self.llm.complete(&prompt).await?;
        Ok(summary.trim().to_string())
    }

    /// Translate `text` into `target_language`.
    ///
    /// Failures are reported in-band as [`Generated::Failed`].
    pub async fn translate_text(&self, text: &str, target_language: &str) -> Generated {
        let prompt = format!(
            "Please translate the following text into {}:\n\n{}",
            target_language, text
        );

        match self.llm.complete(&prompt).await {
            Ok(response) => Generated::Text {
                text: response.trim().to_string(),
            },
            Err(e) => {
                debug!("Translation into {} failed: {}", target_language, e);
                Generated::Failed {
                    operation: Operation::Translation,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AggregatorError, LlmError, SearchError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio_test::block_on;

    #[derive(Default)]
    struct FakeSearch {
        records: Vec<RepositoryRecord>,
        missing_readmes: HashSet<String>,
        fail_search: bool,
        queries: Mutex<Vec<SearchQuery>>,
        readme_requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RepositorySearch for FakeSearch {
        async fn search_repositories(
            &self,
            query: &SearchQuery,
        ) -> std::result::Result<Vec<RepositoryRecord>, SearchError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail_search {
                return Err(SearchError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.records.clone())
        }

        async fn fetch_readme(&self, full_name: &str) -> std::result::Result<String, SearchError> {
            self.readme_requests
                .lock()
                .unwrap()
                .push(full_name.to_string());
            if self.missing_readmes.contains(full_name) {
                return Err(SearchError::Status {
                    status: 404,
                    body: "Not Found".to_string(),
                });
            }
            Ok(format!("# {}", full_name))
        }
    }

    /// Echoes a fixed reply (padded with whitespace) and records prompts.
    struct FakeLlm {
        reply: String,
        fail: bool,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                fail: false,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: String::new(),
                fail: true,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for FakeLlm {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(LlmError::Connect("http://llm.invalid".to_string()));
            }
            Ok(format!("\n  {}  \n", self.reply))
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    fn record(name: &str, description: Option<&str>, stars: u64) -> RepositoryRecord {
        RepositoryRecord {
            full_name: name.to_string(),
            description: description.map(String::from),
            html_url: format!("https://github.com/{}", name),
            forks_count: stars / 10,
            stargazers_count: stars,
        }
    }

    fn aggregator(search: FakeSearch, llm: FakeLlm) -> Aggregator<FakeSearch, FakeLlm> {
        Aggregator::new(search, llm, TemplateStore::builtin())
    }

    #[test]
    fn test_first_five_in_order_unchanged() {
        let records: Vec<_> = (0..7)
            .map(|i| record(&format!("org/repo{}", i), Some("A short description"), 700 - i * 100))
            .collect();
        let agg = aggregator(
            FakeSearch {
                records,
                ..Default::default()
            },
            FakeLlm::replying("unused"),
        );

        let projects = block_on(agg.get_recommended_projects("rust", "cli")).unwrap();

        assert_eq!(projects.len(), 5);
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["org/repo0", "org/repo1", "org/repo2", "org/repo3", "org/repo4"]
        );
        assert!(projects.iter().all(|p| p.description == "A short description"));
        for (i, project) in projects.iter().enumerate() {
            assert_eq!(project.readme, Readme::Fetched(format!("# org/repo{}", i)));
            assert_eq!(project.stars, 700 - i as u64 * 100);
            assert_eq!(project.forks, 70 - i as u64 * 10);
        }
        assert!(agg.llm_backend().prompts().is_empty());
        assert_eq!(agg.search_backend().readme_requests.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_query_built_from_criteria() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying(""));

        block_on(agg.get_recommended_projects("python", "data science")).unwrap();

        let queries = agg.search_backend().queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].q, "data science language:python in:description");
        assert_eq!(queries[0].sort, crate::github::SortKey::Stars);
        assert_eq!(queries[0].order, crate::github::SortOrder::Desc);
    }

    #[test]
    fn test_fewer_results_than_limit() {
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/one", Some("one"), 3), record("a/two", Some("two"), 2)],
                ..Default::default()
            },
            FakeLlm::replying(""),
        );

        let projects = block_on(agg.get_recommended_projects("go", "networking")).unwrap();
        assert_eq!(projects.len(), 2);
    }

    #[test]
    fn test_missing_readme_uses_placeholder() {
        let mut missing = HashSet::new();
        missing.insert("a/two".to_string());
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/one", Some("one"), 3), record("a/two", Some("two"), 2)],
                missing_readmes: missing,
                ..Default::default()
            },
            FakeLlm::replying(""),
        );

        let projects = block_on(agg.get_recommended_projects("go", "networking")).unwrap();

        assert!(projects[0].readme.is_available());
        assert_eq!(projects[1].readme, Readme::Unavailable);
        assert_eq!(projects[1].readme.as_str(), "No README available.");
    }

    #[test]
    fn test_absent_description_placeholder() {
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/one", None, 3)],
                ..Default::default()
            },
            FakeLlm::replying("unused"),
        );

        let projects = block_on(agg.get_recommended_projects("go", "networking")).unwrap();
        assert_eq!(projects[0].description, "No description provided.");
        assert!(agg.llm_backend().prompts().is_empty());
    }

    #[test]
    fn test_long_description_is_summarized() {
        let long = "x".repeat(181);
        let exact = "y".repeat(180);
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/long", Some(&long), 2), record("a/exact", Some(&exact), 1)],
                ..Default::default()
            },
            FakeLlm::replying("Short and sweet."),
        );

        let projects = block_on(agg.get_recommended_projects("rust", "games")).unwrap();

        assert_eq!(projects[0].description, "Short and sweet.");
        assert_eq!(projects[1].description, exact);

        let prompts = agg.llm_backend().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("170"));
        assert!(prompts[0].contains(&long));
    }

    #[test]
    fn test_description_limit_counts_characters() {
        // 180 two-byte characters: over the limit in bytes, not in characters.
        let accented = "é".repeat(180);
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/b", Some(&accented), 1)],
                ..Default::default()
            },
            FakeLlm::replying("unused"),
        );

        let projects = block_on(agg.get_recommended_projects("rust", "i18n")).unwrap();
        assert_eq!(projects[0].description, accented);
    }

    #[test]
    fn test_failed_description_summary_lands_in_description() {
        let long = "z".repeat(200);
        let agg = aggregator(
            FakeSearch {
                records: vec![record("a/b", Some(&long), 1)],
                ..Default::default()
            },
            FakeLlm::failing(),
        );

        let projects = block_on(agg.get_recommended_projects("rust", "x")).unwrap();
        assert!(projects[0]
            .description
            .starts_with("Error during summarization: "));
    }

    #[test]
    fn test_search_failure_propagates() {
        let agg = aggregator(
            FakeSearch {
                fail_search: true,
                ..Default::default()
            },
            FakeLlm::replying(""),
        );

        let err = block_on(agg.get_recommended_projects("rust", "x")).unwrap_err();
        assert!(matches!(err, AggregatorError::Search(_)));
    }

    #[test]
    fn test_summarize_with_template_trims() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying("tiny"));

        let out = block_on(agg.summarize_with_template("some long text", 170));
        assert_eq!(
            out,
            Generated::Text {
                text: "tiny".to_string()
            }
        );
    }

    #[test]
    fn test_summarize_with_template_masks_failure() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::failing());

        let out = block_on(agg.summarize_with_template("text", 170));
        assert!(out.is_failed());
        assert!(out
            .to_string()
            .starts_with("Error during summarization: "));
    }

    #[test]
    fn test_summarize_with_template_masks_template_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let store =
            TemplateStore::from_dir(dir.path(), crate::templates::LoadMode::Reload).unwrap();
        let agg = Aggregator::new(FakeSearch::default(), FakeLlm::replying("x"), store);

        let out = block_on(agg.summarize_with_template("text", 170));
        assert!(out
            .into_text()
            .starts_with("Error during summarization: "));
        assert!(agg.llm_backend().prompts().is_empty());
    }

    #[test]
    fn test_summarize_text_truncates_input() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying("summary"));
        let text = format!("{}{}", "a".repeat(10_000), "b");

        let out = block_on(agg.summarize_text(&text, 500)).unwrap();

        assert_eq!(out, "summary");
        let prompt = &agg.llm_backend().prompts()[0];
        assert_eq!(
            prompt.as_str(),
            format!(
                "Please provide a concise summary (max 500 words) of the following text:\n\n{}",
                "a".repeat(10_000)
            )
        );
    }

    #[test]
    fn test_summarize_text_propagates() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::failing());
        let err = block_on(agg.summarize_text("hello", 500)).unwrap_err();
        assert!(matches!(err, AggregatorError::Llm(LlmError::Connect(_))));
    }

    #[test]
    fn test_analyze_project_culture_two_calls() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying("Friendly."));

        let out = block_on(agg.analyze_project_culture("tokio-rs/axum", "# axum\nErgonomic.")).unwrap();

        assert_eq!(out, "Friendly.");
        let prompts = agg.llm_backend().prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("Please provide a concise summary (max 500 words)"));
        assert!(prompts[0].ends_with("# axum\nErgonomic."));
        assert!(prompts[1].contains("tokio-rs/axum"));
        // The culture prompt carries the summary, not the raw README.
        assert!(prompts[1].contains("Friendly."));
        assert!(!prompts[1].contains("Ergonomic."));
    }

    #[test]
    fn test_analyze_project_culture_propagates() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::failing());
        assert!(block_on(agg.analyze_project_culture("a/b", "readme")).is_err());
    }

    #[test]
    fn test_generate_contribution_guidelines() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying("1. Fork it."));

        let out = block_on(agg.generate_contribution_guidelines("rust-lang/rust")).unwrap();

        assert_eq!(out, "1. Fork it.");
        let prompts = agg.llm_backend().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"rust-lang/rust\""));
    }

    #[test]
    fn test_generate_contribution_guidelines_propagates() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::failing());
        let err = block_on(agg.generate_contribution_guidelines("a/b")).unwrap_err();
        assert!(matches!(err, AggregatorError::Llm(_)));
    }

    #[test]
    fn test_translate_text() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::replying("Hola"));

        let out = block_on(agg.translate_text("Hello", "Spanish"));

        assert_eq!(out.into_text(), "Hola");
        assert_eq!(
            agg.llm_backend().prompts()[0],
            "Please translate the following text into Spanish:\n\nHello"
        );
    }

    #[test]
    fn test_translate_text_masks_failure() {
        let agg = aggregator(FakeSearch::default(), FakeLlm::failing());

        let out = block_on(agg.translate_text("Hello", "German"));
        assert_eq!(
            out.to_string(),
            "Error during translation: cannot connect to LLM endpoint at http://llm.invalid"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}
