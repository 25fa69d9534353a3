//! Display and formatting functions for CLI output

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::formatting::truncate_string;
use crate::models::{HexColor, Job};

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Color")]
    color: String,

    #[tabled(rename = "Status")]
    status: String,
}

/// Color swatch followed by the hex code
fn format_swatch(color: &HexColor) -> String {
    let (r, g, b) = color.rgb();
    format!("{} #{}", "██".truecolor(r, g, b), color)
}

fn format_status(job: &Job) -> String {
    if job.archived {
        "archived".bright_black().to_string()
    } else {
        "active".green().to_string()
    }
}

/// Render jobs as a table
pub fn format_jobs(jobs: &[Job], name_max_length: usize) -> String {
    if jobs.is_empty() {
        return "No jobs found".yellow().to_string();
    }

    let rows: Vec<JobRow> = jobs
        .iter()
        .map(|job| JobRow {
            id: job.id.to_string(),
            name: truncate_string(&job.name, name_max_length),
            color: format_swatch(&job.color),
            status: format_status(job),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[derive(Serialize)]
struct JobJson<'a> {
    id: &'a str,
    name: &'a str,
    color: String,
    archived: bool,
}

/// Render jobs as a JSON array
pub fn format_jobs_json(jobs: &[Job]) -> serde_json::Result<String> {
    let entries: Vec<JobJson> = jobs
        .iter()
        .map(|job| JobJson {
            id: job.id.as_str(),
            name: &job.name,
            color: format!("#{}", job.color),
            archived: job.archived,
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// One-line confirmation after a CLI mutation
pub fn format_job_line(action: &str, job: &Job) -> String {
    format!(
        "{} {} {} ({})",
        action.green(),
        format_swatch(&job.color),
        job.name.bold(),
        job.id
    )
}
