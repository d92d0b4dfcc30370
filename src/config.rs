//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.contribscout.toml` files.

use crate::github::GitHubConfig;
use crate::llm::ChatConfig;
use crate::templates::{LoadMode, TemplateStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".contribscout.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubSettings,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Prompt template settings.
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report output path; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// REST API base URL.
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Access token. Prefer the GITHUB_API_TOKEN environment variable.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_github_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token: None,
            timeout_seconds: default_github_timeout(),
        }
    }
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_timeout() -> u64 {
    30
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Chat endpoint base URL.
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            url: default_llm_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_llm_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout() -> u64 {
    300
}

/// Prompt template settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding `<name>.txt` templates; built-in templates when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// `reload` re-reads templates on every use, `preload` reads them once.
    #[serde(default)]
    pub mode: LoadMode,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or through their environment
    /// variables) override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref url) = args.llm_url {
            self.model.url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if let Some(ref token) = args.github_token {
            self.github.token = Some(token.clone());
        }
        if let Some(ref url) = args.github_api_url {
            self.github.api_url = url.clone();
        }

        if let Some(ref dir) = args.templates {
            self.templates.dir = Some(dir.clone());
        }
        if args.preload_templates {
            self.templates.mode = LoadMode::Preload;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
    }

    pub fn github_config(&self) -> GitHubConfig {
        GitHubConfig {
            api_url: self.github.api_url.clone(),
            token: self.github.token.clone().filter(|t| !t.trim().is_empty()),
            timeout_seconds: self.github.timeout_seconds,
        }
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            url: self.model.url.clone(),
            model_name: self.model.name.clone(),
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            timeout_seconds: self.model.timeout_seconds,
        }
    }

    /// Open the configured template store.
    pub fn template_store(&self) -> Result<TemplateStore> {
        match self.templates.dir {
            Some(ref dir) => TemplateStore::from_dir(dir, self.templates.mode)
                .with_context(|| format!("Failed to open templates in {}", dir.display())),
            None => Ok(TemplateStore::builtin()),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
