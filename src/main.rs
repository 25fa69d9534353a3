//! teamjobs - manage a team's job titles from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use teamjobs::display;
use teamjobs::logging;
use teamjobs::models::{default_palette, AppConfig, HexColor, JobCollection, JobId};
use teamjobs::store::{FileStore, JobBackend};
use teamjobs::tui;
use teamjobs::tui::app::query_jobs;

#[derive(Parser)]
#[command(name = "teamjobs")]
#[command(about = "Manage a team's job titles", long_about = None)]
#[command(version)]
struct Cli {
    /// Path of the job store (overrides config and TEAMJOBS_STORE)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the team's jobs
    #[command(alias = "ls")]
    List {
        /// Only show jobs whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Include archived jobs
        #[arg(short, long)]
        archived: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a job
    Add {
        /// Job name
        name: String,

        /// Color as 6 hex digits (default: next palette color)
        #[arg(short, long, value_name = "HEX")]
        color: Option<String>,
    },

    /// Rename a job
    Rename {
        /// Job ID
        id: String,

        /// New name
        name: String,
    },

    /// Change a job's color
    Color {
        /// Job ID
        id: String,

        /// Color as 6 hex digits
        hex: String,
    },

    /// Archive a job
    Archive {
        /// Job ID
        id: String,
    },

    /// Launch interactive TUI mode
    #[command(alias = "ui")]
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, warnings) = AppConfig::load().context("loading configuration")?;
    if let Some(path) = cli.store {
        config.store.path = Some(path);
    }

    let command = cli.command.unwrap_or(Commands::List {
        search: None,
        archived: false,
        json: false,
    });

    if !matches!(command, Commands::Tui) {
        logging::init_cli_logging();
        for warning in &warnings {
            tracing::warn!("config: {}", warning);
        }
    }

    let store = open_store(&config);
    let output = match command {
        Commands::List { search, archived, json } => {
            handle_list_command(&store, &config, search.as_deref(), archived, json)?
        }
        Commands::Add { name, color } => handle_add_command(&store, &config, &name, color.as_deref())?,
        Commands::Rename { id, name } => handle_rename_command(&store, &id, &name)?,
        Commands::Color { id, hex } => handle_color_command(&store, &id, &hex)?,
        Commands::Archive { id } => handle_archive_command(&store, &id)?,
        Commands::Tui => {
            let log_path = logging::init_tui_logging()?;
            tracing::info!(log = %log_path.display(), "starting TUI");
            let backend: Arc<dyn JobBackend> = Arc::new(store);
            return tui::run(config, warnings, backend);
        }
    };
    println!("{}", output);

    Ok(())
}

fn open_store(config: &AppConfig) -> FileStore {
    FileStore::new(config.store_path()).with_team(config.store.team_name.clone())
}

fn handle_list_command(
    store: &FileStore,
    config: &AppConfig,
    search: Option<&str>,
    include_archived: bool,
    json: bool,
) -> Result<String> {
    let jobs: JobCollection = store
        .list_jobs()
        .with_context(|| format!("reading {}", store.path().display()))?
        .into_iter()
        .collect();

    let shown: Vec<_> = query_jobs(&jobs, search.unwrap_or(""))
        .iter()
        .filter(|job| include_archived || !job.archived)
        .cloned()
        .collect();

    if json {
        Ok(display::format_jobs_json(&shown)?)
    } else {
        Ok(display::format_jobs(&shown, config.display.name_max_length))
    }
}

fn handle_add_command(
    store: &FileStore,
    config: &AppConfig,
    name: &str,
    color: Option<&str>,
) -> Result<String> {
    let color = match color {
        Some(hex) => HexColor::parse(hex)?,
        None => {
            let active = store.list_jobs()?.iter().filter(|j| !j.archived).count();
            let mut palette = config.palette();
            if palette.is_empty() {
                palette = default_palette();
            }
            palette
                .get(active % palette.len().max(1))
                .cloned()
                .context("no palette colors configured")?
        }
    };

    let job = store.create_job(name, &color)?;
    Ok(display::format_job_line("Added", &job))
}

fn handle_rename_command(store: &FileStore, id: &str, name: &str) -> Result<String> {
    let job = store.rename_job(&JobId::new(id), name)?;
    Ok(display::format_job_line("Renamed", &job))
}

fn handle_color_command(store: &FileStore, id: &str, hex: &str) -> Result<String> {
    let color = HexColor::parse(hex)?;
    let job = store.recolor_job(&JobId::new(id), &color)?;
    Ok(display::format_job_line("Recolored", &job))
}

fn handle_archive_command(store: &FileStore, id: &str) -> Result<String> {
    let job = store.archive_job(&JobId::new(id))?;
    Ok(display::format_job_line("Archived", &job))
}
