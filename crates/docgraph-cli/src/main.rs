use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use docgraph_core::{Project, Reflection, SerializerConfig};

#[derive(Parser)]
#[command(name = "docgraph")]
#[command(about = "Inspect and re-encode serialized documentation projects", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Serializer configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every declaration and signature with its rendered type
    Render {
        /// Project JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Decode and re-encode a project, failing if the output differs
    Check {
        /// Project JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Decode a project and write its canonical encoding
    Reencode {
        /// Project JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .init();

    let config = match &cli.config {
        Some(path) => SerializerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => SerializerConfig::default(),
    };

    match cli.command {
        Commands::Render { input } => {
            let project = load_project(&input)?;
            print!("{}", render_listing(&project));
            Ok(())
        }
        Commands::Check { input } => handle_check(&input, &config),
        Commands::Reencode { input, output } => handle_reencode(&input, &output, &config),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {:?}", path))
}

fn load_project(path: &Path) -> Result<Project> {
    let project = Project::from_json_value(read_json(path)?)
        .with_context(|| format!("Failed to decode project: {:?}", path))?;
    debug!(name = %project.name, reflections = project.len(), "loaded project");
    Ok(project)
}

/// One line per reflection, indented by depth
fn render_listing(project: &Project) -> String {
    let mut out = String::new();
    writeln!(out, "Project {}", project.name).ok();
    for id in project.children() {
        if let Some(reflection) = project.get(*id) {
            render_reflection(project, reflection, 1, &mut out);
        }
    }
    out
}

fn render_reflection(project: &Project, reflection: &Reflection, depth: usize, out: &mut String) {
    let description = project.describe(reflection.id).unwrap_or_default();
    let indent = "  ".repeat(depth);
    match reflection.ty() {
        Some(ty) if reflection.as_signature().is_none() => {
            writeln!(out, "{}{}: {}", indent, description, ty.render(project)).ok();
        }
        _ => {
            writeln!(out, "{}{}", indent, description).ok();
        }
    }
    let _ = project.traverse(reflection.id, |child, _| {
        render_reflection(project, child, depth + 1, out);
        ControlFlow::Continue(())
    });
}

/// Whether re-encoding `input` reproduces it exactly
fn reencodes_identically(input: &serde_json::Value, config: &SerializerConfig) -> Result<bool> {
    let project = Project::from_json_value(input.clone()).context("Failed to decode project")?;
    let output = project
        .to_json_value(config)
        .context("Failed to encode project")?;
    Ok(&output == input)
}

fn handle_check(input: &Path, config: &SerializerConfig) -> Result<()> {
    let value = read_json(input)?;
    if !reencodes_identically(&value, config)? {
        anyhow::bail!("Re-encoded project differs from {:?}", input);
    }
    info!("{:?} round-trips cleanly", input);
    Ok(())
}

fn handle_reencode(input: &Path, output: &Path, config: &SerializerConfig) -> Result<()> {
    let project = load_project(input)?;
    let text = project
        .to_json_string(config)
        .context("Failed to encode project")?;
    fs::write(output, text).with_context(|| format!("Failed to write output: {:?}", output))?;
    info!("Project written to {:?}", output);
    Ok(())
}
