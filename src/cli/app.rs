//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{dependency_cmd, milestone_cmd, product_cmd};
use crate::config::Config;
use crate::project::Project;

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(author, version, about = "Local-first product roadmap and milestone planning")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (falls back to `default_format` from the global config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new roadmap project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show roadmap overview
    Status,

    /// Manage products
    #[command(subcommand)]
    Product(product_cmd::ProductCommands),

    /// Manage milestones
    #[command(subcommand)]
    Milestone(milestone_cmd::MilestoneCommands),

    /// Manage dependencies between milestones
    #[command(subcommand)]
    Dep(dependency_cmd::DepCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = match cli.format {
        Some(format) => format,
        None => Config::load()?.global.default_format,
    };
    let output = Output::new(format, cli.verbose);

    if cli.verbose {
        init_tracing();
    }

    match cli.command {
        Commands::Init { path } => {
            output.verbose(&format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized roadmap project at {}",
                project.root().display()
            ));
        }

        Commands::Status => status(&output)?,

        Commands::Product(cmd) => product_cmd::run(cmd, &output)?,
        Commands::Milestone(cmd) => milestone_cmd::run(cmd, &output)?,
        Commands::Dep(cmd) => dependency_cmd::run(cmd, &output)?,
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roadmap_cli=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let products = project.product_service().list()?;
    let milestone_service = project.milestone_service();
    let dependencies = project.dependency_service().list(None)?;

    let mut milestone_count = 0;
    let mut lines = Vec::new();
    for product in &products {
        let milestones = milestone_service.list_by_product(&product.id)?;
        milestone_count += milestones.len();
        lines.push((product, milestones.len()));
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "products": products.len(),
            "milestones": milestone_count,
            "dependencies": dependencies.len(),
        }));
        return Ok(());
    }

    println!("Roadmap: {}", project.root().display());
    println!(
        "{} products, {} milestones, {} dependencies",
        products.len(),
        milestone_count,
        dependencies.len()
    );
    if !lines.is_empty() {
        output.blank();
        for (product, count) in lines {
            println!(
                "  {} [{}] {} - {} milestones",
                product.id,
                product.lifecycle_status.as_str(),
                product.name,
                count
            );
        }
    }
    Ok(())
}
