//! ContribScout - find open source projects worth contributing to.
//!
//! Exit codes:
//!   0 - Success (including "no projects found")
//!   1 - Invalid arguments or runtime error (search failure, config, I/O)

use anyhow::{Context, Result};
use chrono::Utc;
use contribscout::analysis::{Aggregator, SUMMARY_MAX_WORDS};
use contribscout::cli::{Args, OutputFormat};
use contribscout::config::{Config, CONFIG_FILE_NAME};
use contribscout::github::{GitHubClient, RepositorySearch};
use contribscout::llm::{ChatClient, CompletionBackend};
use contribscout::models::{ProjectReport, Report, ReportMetadata, SearchCriteria, Translation};
use contribscout::report;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Variables already set in the environment win over .env
    dotenvy::dotenv().ok();

    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("ContribScout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .contribscout.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to choose the model, endpoint and prompt templates.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Start a spinner on stderr unless running quietly.
fn spinner(args: &Args, message: String) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Search, analyze and write the report.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let search = GitHubClient::new(config.github_config()).context("Failed to create GitHub client")?;
    let llm = ChatClient::new(config.chat_config()).context("Failed to create LLM client")?;
    let templates = config.template_store()?;
    let aggregator = Aggregator::new(search, llm, templates);

    let criteria = SearchCriteria::new(args.tech_stack(), args.interest_areas());

    let pb = spinner(&args, "Fetching recommended projects...".to_string());
    let projects = aggregator
        .get_recommended_projects(&criteria.tech_stack, &criteria.interest_areas)
        .await
        .context("Failed to fetch recommended projects");
    finish(pb);
    let projects = projects?;

    if projects.is_empty() {
        eprintln!("⚠️  No projects found. Please try different inputs.");
    }

    let mut entries = Vec::with_capacity(projects.len());
    for project in projects {
        entries.push(process_project(&aggregator, &args, ProjectReport::new(project)).await);
    }

    let report = Report {
        metadata: ReportMetadata {
            criteria,
            generated_at: Utc::now(),
            model_used: aggregator.llm_backend().model_name().to_string(),
            project_count: entries.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        projects: entries,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "\n✅ {} projects ({} analyzed) in {:.1}s. Report saved to: {}",
                report.metadata.project_count,
                report.analyzed_count(),
                report.metadata.duration_seconds,
                path.display()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Run the optional per-project steps requested on the command line.
///
/// Failures of the propagating operations are logged and leave the field
/// empty so the remaining projects still make it into the report.
async fn process_project<S, L>(
    aggregator: &Aggregator<S, L>,
    args: &Args,
    mut entry: ProjectReport,
) -> ProjectReport
where
    S: RepositorySearch,
    L: CompletionBackend,
{
    let name = entry.project.name.clone();

    if args.summarize {
        if entry.project.readme.is_available() {
            let pb = spinner(args, format!("Generating summary for {}...", name));
            let summary = aggregator
                .summarize_text(entry.project.readme.as_str(), SUMMARY_MAX_WORDS)
                .await;
            finish(pb);
            match summary {
                Ok(summary) => entry.readme_summary = Some(summary),
                Err(e) => warn!("README summary failed for {}: {}", name, e),
            }
        } else {
            debug!("Skipping README summary for {}: no README", name);
        }
    }

    if args.analyze {
        let pb = spinner(args, format!("Analyzing culture for {}...", name));
        let analysis = aggregator
            .analyze_project_culture(&name, entry.project.readme.as_str())
            .await;
        finish(pb);
        match analysis {
            Ok(analysis) => entry.culture_analysis = Some(analysis),
            Err(e) => warn!("Culture analysis failed for {}: {}", name, e),
        }

        let pb = spinner(args, format!("Generating guidelines for {}...", name));
        let guidelines = aggregator.generate_contribution_guidelines(&name).await;
        finish(pb);
        match guidelines {
            Ok(guidelines) => entry.guidelines = Some(guidelines),
            Err(e) => warn!("Guideline generation failed for {}: {}", name, e),
        }
    }

    if let Some(ref language) = args.translate {
        let language = language.trim();
        let pb = spinner(args, format!("Translating {} into {}...", name, language));
        let description = aggregator
            .translate_text(&entry.project.description, language)
            .await;
        let readme_summary = match entry.readme_summary {
            Some(ref summary) => Some(aggregator.translate_text(summary, language).await),
            None => None,
        };
        finish(pb);

        if description.is_failed() {
            warn!("Translation failed for {}: {}", name, description);
        }

        entry.translation = Some(Translation {
            language: language.to_string(),
            description: description.into_text(),
            readme_summary: readme_summary.map(|s| s.into_text()),
        });
    }

    entry
}
