//! ReelCut CLI
//!
//! Headless front end over the timeline core.
//!
//! Usage:
//!   reelcut-cli tools [--category essentials]         - List the tool catalogue
//!   reelcut-cli apply --script ops.json [--project p] - Run a command script
//!   reelcut-cli manifest --project p.json             - Print the export manifest

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use reelcut::core::{
    commands::{CommandPayload, CommandResult},
    session::EditorSession,
    settings::AppSettings,
    tools::{all_tools, tools_in_category, ToolCategory, ToolDefinition},
};

#[derive(Parser)]
#[command(name = "reelcut-cli", about = "ReelCut headless timeline editing", version)]
struct Cli {
    /// Settings file (JSON); defaults apply when absent
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tool catalogue
    Tools {
        /// Only tools of this category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run a command script against a timeline
    Apply {
        /// Timeline document; a new project with default lanes when absent
        #[arg(short, long)]
        project: Option<PathBuf>,
        /// JSON array of { commandType, payload } objects
        #[arg(short, long)]
        script: PathBuf,
        /// Where to write the edited timeline (stdout when absent)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the export manifest of a timeline
    Manifest {
        #[arg(short, long)]
        project: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Essentials,
    Insert,
    Adjust,
    Enhance,
}

impl From<CategoryArg> for ToolCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Essentials => ToolCategory::Essentials,
            CategoryArg::Insert => ToolCategory::Insert,
            CategoryArg::Adjust => ToolCategory::Adjust,
            CategoryArg::Enhance => ToolCategory::Enhance,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    reelcut::init_logging(cli.log_dir.as_deref());

    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Commands::Tools { category, json } => list_tools(category.map(Into::into), json),
        Commands::Apply {
            project,
            script,
            out,
        } => apply(project.as_deref(), &script, out.as_deref(), settings),
        Commands::Manifest { project } => manifest(&project, settings),
    }
}

fn load_settings(path: Option<&Path>) -> Result<AppSettings> {
    match path {
        Some(path) => AppSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(AppSettings::default()),
    }
}

fn list_tools(category: Option<ToolCategory>, json: bool) -> Result<()> {
    let tools: Vec<&ToolDefinition> = match category {
        Some(category) => tools_in_category(category).collect(),
        None => all_tools().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }
    for tool in tools {
        let shortcut = tool.shortcut.map(String::from).unwrap_or_default();
        println!(
            "{:<12} {:<12} {:<11} {}",
            tool.id,
            tool.label,
            format!("{:?}", tool.category),
            shortcut
        );
    }
    Ok(())
}

fn open_session(project: Option<&Path>, settings: AppSettings) -> Result<EditorSession> {
    match project {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read project {}", path.display()))?;
            EditorSession::open_json(&json, settings)
                .with_context(|| format!("Invalid project {}", path.display()))
        }
        None => Ok(EditorSession::new(settings)),
    }
}

/// Runs a script and returns the edited timeline document plus per-command results
fn apply_script(
    project: Option<&Path>,
    script: &Path,
    settings: AppSettings,
) -> Result<(String, Vec<CommandResult>)> {
    let mut session = open_session(project, settings)?;

    let script_json = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let payloads = CommandPayload::parse_script(&script_json)?;
    let count = payloads.len();

    let results = session
        .run_script(payloads)
        .context("Script aborted; timeline left unchanged")?;
    info!("Applied {} command(s)", count);

    Ok((session.timeline().to_json()?, results))
}

fn apply(
    project: Option<&Path>,
    script: &Path,
    out: Option<&Path>,
    settings: AppSettings,
) -> Result<()> {
    let (document, results) = apply_script(project, script, settings)?;

    match out {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            for result in &results {
                eprintln!("{} {} change(s)", result.op_id, result.changes.len());
            }
        }
        None => println!("{}", document),
    }
    Ok(())
}

fn manifest(project: &Path, settings: AppSettings) -> Result<()> {
    let session = open_session(Some(project), settings)?;
    println!("{}", session.export_manifest().to_json_pretty()?);
    Ok(())
}
