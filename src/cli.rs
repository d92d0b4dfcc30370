//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use clap::Parser;
use std::path::PathBuf;

/// ContribScout - find open source projects worth contributing to
///
/// Searches GitHub for the most-starred projects matching your stack and
/// interests, then uses an LLM to summarize them, describe their culture
/// and draft contribution guidelines.
///
/// Examples:
///   contribscout --stack rust --interests "web development"
///   contribscout -s python -i "data science" --summarize --analyze -o report.md
///   contribscout -s go -i networking --translate Spanish --format json -o report.json
///   contribscout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Technology stack (primary language), e.g. rust, python, javascript
    #[arg(short = 's', long = "stack", value_name = "LANG", required_unless_present = "init_config")]
    pub tech_stack: Option<String>,

    /// Areas of interest, e.g. "web development", "data science"
    #[arg(short = 'i', long = "interests", value_name = "TEXT", required_unless_present = "init_config")]
    pub interest_areas: Option<String>,

    /// Add an LLM summary of each project's README
    #[arg(long)]
    pub summarize: bool,

    /// Analyze project culture and generate contribution guidelines
    #[arg(short, long)]
    pub analyze: bool,

    /// Translate descriptions (and summaries) into this language
    #[arg(short, long, value_name = "LANGUAGE")]
    pub translate: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// LLM model name
    #[arg(short, long, env = "LLM_MODEL")]
    pub model: Option<String>,

    /// LLM chat endpoint base URL
    #[arg(long, env = "LLM_URL", value_name = "URL")]
    pub llm_url: Option<String>,

    /// Sampling temperature for LLM responses (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// LLM request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub github_api_url: Option<String>,

    /// Directory containing prompt templates
    ///
    /// Uses the built-in templates when not set.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Read templates once at startup instead of on every use
    #[arg(long)]
    pub preload_templates: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .contribscout.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .contribscout.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn tech_stack(&self) -> &str {
        self.tech_stack.as_deref().unwrap_or("").trim()
    }

    pub fn interest_areas(&self) -> &str {
        self.interest_areas.as_deref().unwrap_or("").trim()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.tech_stack().is_empty() || self.interest_areas().is_empty() {
            return Err(
                "Please provide both your technology stack and areas of interest.".to_string(),
            );
        }

        if let Some(ref url) = self.llm_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("LLM URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref url) = self.github_api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("GitHub API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref language) = self.translate {
            if language.trim().is_empty() {
                return Err("Translation language must not be empty".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref dir) = self.templates {
            if !dir.is_dir() {
                return Err(format!(
                    "Templates directory does not exist: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            tech_stack: Some("rust".to_string()),
            interest_areas: Some("web development".to_string()),
            summarize: false,
            analyze: false,
            translate: None,
            output: None,
            format: OutputFormat::Markdown,
            model: None,
            llm_url: None,
            temperature: None,
            timeout: None,
            github_token: None,
            github_api_url: None,
            templates: None,
            preload_templates: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_blank_inputs() {
        let mut args = make_args();
        args.interest_areas = Some("   ".to_string());
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.tech_stack = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.tech_stack = None;
        args.interest_areas = None;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_llm_url() {
        let mut args = make_args();
        args.llm_url = Some("localhost:11434".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "contribscout",
            "--stack",
            "go",
            "--interests",
            "networking",
            "--analyze",
            "--translate",
            "French",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.tech_stack(), "go");
        assert_eq!(args.interest_areas(), "networking");
        assert!(args.analyze);
        assert_eq!(args.translate.as_deref(), Some("French"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_env_file_feeds_fallbacks() {
        let dir = tempfile::TempDir::new().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "LLM_MODEL=model-from-env-file\n").unwrap();

        if std::env::var_os("LLM_MODEL").is_some() {
            // an exported value takes precedence over the file
            return;
        }
        dotenvy::from_path(&env_file).unwrap();

        let args = Args::try_parse_from(["contribscout", "-s", "rust", "-i", "cli"]).unwrap();
        assert_eq!(args.model.as_deref(), Some("model-from-env-file"));
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
