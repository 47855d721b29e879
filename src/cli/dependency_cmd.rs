//! Dependency CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Dependency, DependencyId, DependencyType, MilestoneId, ProductId};
use crate::project::Project;
use crate::service::DependencyCreate;

#[derive(Subcommand)]
pub enum DepCommands {
    /// Link two milestones: the target follows the source's dates
    Add {
        /// Source milestone ID (the one that moves first)
        source: String,

        /// Target milestone ID (the one that follows)
        target: String,

        /// Dependency type: FS (finish-to-start), SS, or FF
        #[arg(long = "type", default_value = "FS")]
        dep_type: String,
    },

    /// List dependency edges
    List {
        /// Only edges touching this product's milestones
        #[arg(long, conflicts_with = "target")]
        product: Option<String>,

        /// Only edges pointing at this milestone
        #[arg(long)]
        target: Option<String>,
    },

    /// Show edge details
    Show {
        /// Dependency ID
        id: String,
    },

    /// Remove an edge
    Remove {
        /// Dependency ID
        id: String,
    },
}

pub fn run(cmd: DepCommands, output: &Output) -> Result<()> {
    match cmd {
        DepCommands::Add {
            source,
            target,
            dep_type,
        } => add_dependency(output, &source, &target, &dep_type),
        DepCommands::List { product, target } => {
            list_dependencies(output, product.as_deref(), target.as_deref())
        }
        DepCommands::Show { id } => show_dependency(output, &id),
        DepCommands::Remove { id } => remove_dependency(output, &id),
    }
}

fn add_dependency(output: &Output, source_str: &str, target_str: &str, type_str: &str) -> Result<()> {
    let project = Project::open_current()?;

    let req = DependencyCreate {
        source_milestone_id: source_str.parse::<MilestoneId>()?,
        target_milestone_id: target_str.parse::<MilestoneId>()?,
        dep_type: type_str.parse::<DependencyType>()?,
    };
    let dependency = project.dependency_service().create(&project.actor(), req)?;

    if output.is_json() {
        output.data(&dependency);
    } else {
        output.success(&format!(
            "Created dependency: {} ({} -{}-> {})",
            dependency.id,
            dependency.source_milestone_id,
            dependency.dep_type,
            dependency.target_milestone_id
        ));
    }
    Ok(())
}

fn list_dependencies(
    output: &Output,
    product_str: Option<&str>,
    target_str: Option<&str>,
) -> Result<()> {
    let project = Project::open_current()?;
    let service = project.dependency_service();

    let edges = if let Some(raw) = target_str {
        service.list_by_target(&raw.parse::<MilestoneId>()?)?
    } else {
        let product_id = match product_str {
            Some(raw) => Some(raw.parse::<ProductId>()?),
            None => None,
        };
        service.list(product_id.as_ref())?
    };

    if output.is_json() {
        output.data(&edges);
    } else if edges.is_empty() {
        println!("No dependencies");
    } else {
        println!("{:<12} {:<12} {:<12} TYPE", "ID", "SOURCE", "TARGET");
        println!("{}", "-".repeat(52));
        for edge in edges {
            println!(
                "{:<12} {:<12} {:<12} {}",
                edge.id.to_string(),
                edge.source_milestone_id.to_string(),
                edge.target_milestone_id.to_string(),
                edge.dep_type
            );
        }
    }
    Ok(())
}

fn show_dependency(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: DependencyId = id_str.parse()?;
    let dependency = project.dependency_service().get(&id)?;

    if output.is_json() {
        output.data(&dependency);
    } else {
        print_dependency(&dependency);
    }
    Ok(())
}

fn remove_dependency(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: DependencyId = id_str.parse()?;

    project.dependency_service().delete(&project.actor(), &id)?;
    output.success(&format!("Removed dependency: {}", id));
    Ok(())
}

fn print_dependency(d: &Dependency) {
    println!("ID:      {}", d.id);
    println!("Source:  {}", d.source_milestone_id);
    println!("Target:  {}", d.target_milestone_id);
    println!("Type:    {}", d.dep_type);
    println!("Created: {}", d.created_at.format("%Y-%m-%d %H:%M"));
}
