//! Markdown and JSON report generation.
//!
//! Renders the recommended projects together with whatever analysis was
//! requested for them.

use crate::models::{ProjectReport, Report, ReportMetadata, RepositorySummary};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# ContribScout Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata, report.analyzed_count()));
    output.push_str(&generate_table_of_contents(&report.projects));
    output.push_str(&generate_projects_section(&report.projects));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata, analyzed: usize) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Technology Stack:** {}\n",
        metadata.criteria.tech_stack
    ));
    section.push_str(&format!(
        "- **Interest Areas:** {}\n",
        metadata.criteria.interest_areas
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!("- **Projects:** {}\n", metadata.project_count));
    if analyzed > 0 {
        section.push_str(&format!("- **Analyzed:** {}\n", analyzed));
    }
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn anchor(name: &str) -> String {
    name.replace(['/', '.', ' '], "-").to_lowercase()
}

fn generate_table_of_contents(projects: &[ProjectReport]) -> String {
    if projects.is_empty() {
        return String::new();
    }

    let mut toc = String::new();
    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Projects](#projects)\n");

    for (i, entry) in projects.iter().enumerate() {
        toc.push_str(&format!(
            "  - [{}. {}](#{})\n",
            i + 1,
            entry.project.name,
            anchor(&entry.project.name)
        ));
    }
    toc.push('\n');

    toc
}

fn generate_projects_section(projects: &[ProjectReport]) -> String {
    let mut section = String::new();
    section.push_str("## Projects\n\n");

    if projects.is_empty() {
        section.push_str("No projects found. Try a different technology stack or interest area.\n\n");
        return section;
    }

    for (i, entry) in projects.iter().enumerate() {
        section.push_str(&generate_project_block(i + 1, entry));
    }

    section
}

fn generate_project_header(index: usize, project: &RepositorySummary) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### {}. {} {{#{}}}\n\n",
        index,
        project.name,
        anchor(&project.name)
    ));
    block.push_str(&format!(
        "*⭐ {} stars | 🍴 {} forks*\n\n",
        project.stars, project.forks
    ));
    block.push_str(&format!("**Description:** {}\n\n", project.description));
    block.push_str(&format!("**URL:** [{}]({})\n\n", project.url, project.url));

    block
}

fn generate_project_block(index: usize, entry: &ProjectReport) -> String {
    let mut block = generate_project_header(index, &entry.project);

    if let Some(ref summary) = entry.readme_summary {
        block.push_str("#### Summary\n\n");
        block.push_str(summary);
        block.push_str("\n\n");
    } else if !entry.project.readme.is_available() {
        block.push_str(&format!("*{}*\n\n", entry.project.readme));
    }

    if let Some(ref analysis) = entry.culture_analysis {
        block.push_str("#### Culture Analysis\n\n");
        block.push_str(analysis);
        block.push_str("\n\n");
    }

    if let Some(ref guidelines) = entry.guidelines {
        block.push_str("#### Contribution Guidelines\n\n");
        block.push_str(guidelines);
        block.push_str("\n\n");
    }

    if let Some(ref translation) = entry.translation {
        block.push_str(&format!("#### Translation ({})\n\n", translation.language));
        block.push_str(&format!("**Description:** {}\n\n", translation.description));
        if let Some(ref summary) = translation.readme_summary {
            block.push_str(summary);
            block.push_str("\n\n");
        }
    }

    block.push_str("---\n\n");

    block
}

fn generate_footer() -> String {
    "*Report generated by ContribScout*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
