//! Prompt template assets.
//!
//! Templates are plain text files with named placeholders. There is no
//! control flow: rendering is a single pass of named-slot substitution, and
//! substituted values are never rescanned.
//!
//! Two marker conventions are in use, chosen per template by
//! [`TemplateName::marker_style`]:
//!
//! - [`MarkerStyle::DoubleBrace`]: `{{ name }}` is replaced when `name` is
//!   bound and left verbatim otherwise. Single braces are plain text.
//! - [`MarkerStyle::SingleBrace`]: `{name}` must be bound, and `{{` / `}}`
//!   are escapes for literal braces.

use crate::error::TemplateError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// The three prompt assets the aggregator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    Description,
    CultureAnalysis,
    ContributionGuidelines,
}

impl TemplateName {
    pub const ALL: [TemplateName; 3] = [
        TemplateName::Description,
        TemplateName::CultureAnalysis,
        TemplateName::ContributionGuidelines,
    ];

    /// Logical asset name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Description => "description_prompt",
            TemplateName::CultureAnalysis => "culture_analysis_prompt",
            TemplateName::ContributionGuidelines => "contribution_guidelines_prompt",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }

    pub fn marker_style(&self) -> MarkerStyle {
        match self {
            TemplateName::Description => MarkerStyle::DoubleBrace,
            TemplateName::CultureAnalysis | TemplateName::ContributionGuidelines => {
                MarkerStyle::SingleBrace
            }
        }
    }

    /// Copy of the asset compiled into the binary.
    pub fn builtin(&self) -> &'static str {
        match self {
            TemplateName::Description => include_str!("../../templates/description_prompt.txt"),
            TemplateName::CultureAnalysis => {
                include_str!("../../templates/culture_analysis_prompt.txt")
            }
            TemplateName::ContributionGuidelines => {
                include_str!("../../templates/contribution_guidelines_prompt.txt")
            }
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder syntax of a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `{{ name }}`; unbound markers stay in the output.
    DoubleBrace,
    /// `{name}`; unbound markers are an error, `{{` and `}}` escape braces.
    SingleBrace,
}

impl MarkerStyle {
    fn regex(&self) -> &'static Regex {
        static DOUBLE: OnceLock<Regex> = OnceLock::new();
        static SINGLE: OnceLock<Regex> = OnceLock::new();

        match self {
            MarkerStyle::DoubleBrace => DOUBLE.get_or_init(|| {
                Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
                    .expect("double-brace pattern is valid")
            }),
            MarkerStyle::SingleBrace => SINGLE.get_or_init(|| {
                Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}")
                    .expect("single-brace pattern is valid")
            }),
        }
    }
}

/// Named values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    values: BTreeMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A loaded template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    source: String,
    style: MarkerStyle,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, source: impl Into<String>, style: MarkerStyle) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            style,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute placeholders from `ctx`.
    ///
    /// With [`MarkerStyle::SingleBrace`] this fails on the first placeholder
    /// without a binding.
    pub fn render(&self, ctx: &PromptContext) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(self.source.len());
        let mut last = 0;

        for caps in self.style.regex().captures_iter(&self.source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&self.source[last..whole.start()]);
            last = whole.end();

            let Some(key) = caps.get(1).map(|m| m.as_str()) else {
                // `{{` or `}}` escape
                output.push_str(&whole.as_str()[..1]);
                continue;
            };

            match (ctx.get(key), self.style) {
                (Some(value), _) => output.push_str(value),
                (None, MarkerStyle::DoubleBrace) => output.push_str(whole.as_str()),
                (None, MarkerStyle::SingleBrace) => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        placeholder: key.to_string(),
                    })
                }
            }
        }

        output.push_str(&self.source[last..]);
        Ok(output)
    }
}

/// When template files are read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Re-read the file on every use.
    #[default]
    Reload,
    /// Read all templates once when the store is opened.
    Preload,
}

/// Resolves logical template names to template bodies.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: Option<PathBuf>,
    preloaded: HashMap<TemplateName, PromptTemplate>,
}

impl TemplateStore {
    /// Store backed by the templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            dir: None,
            preloaded: HashMap::new(),
        }
    }

    /// Store backed by `<dir>/<name>.txt` files.
    pub fn from_dir(dir: impl Into<PathBuf>, mode: LoadMode) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let mut preloaded = HashMap::new();

        if mode == LoadMode::Preload {
            for name in TemplateName::ALL {
                preloaded.insert(name, read_template(&dir, name)?);
            }
            debug!("Preloaded {} templates from {}", preloaded.len(), dir.display());
        }

        Ok(Self {
            dir: Some(dir),
            preloaded,
        })
    }

    /// Fetch a template by name.
    pub fn load(&self, name: TemplateName) -> Result<PromptTemplate, TemplateError> {
        if let Some(template) = self.preloaded.get(&name) {
            return Ok(template.clone());
        }

        match self.dir {
            Some(ref dir) => read_template(dir, name),
            None => Ok(PromptTemplate::new(
                name.as_str(),
                name.builtin(),
                name.marker_style(),
            )),
        }
    }

    /// Load and render in one step.
    pub fn render(&self, name: TemplateName, ctx: &PromptContext) -> Result<String, TemplateError> {
        self.load(name)?.render(ctx)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_template(dir: &Path, name: TemplateName) -> Result<PromptTemplate, TemplateError> {
    let path = dir.join(name.file_name());
    debug!("Reading template {} from {}", name, path.display());

    let source = std::fs::read_to_string(&path).map_err(|source| TemplateError::Read {
        name: name.as_str(),
        path: path.display().to_string(),
        source,
    })?;

    Ok(PromptTemplate::new(name.as_str(), source, name.marker_style()))
}
