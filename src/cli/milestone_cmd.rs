//! Milestone CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Milestone, MilestoneId, ProductId, VersionId};
use crate::project::Project;
use crate::service::{MilestoneCreate, MilestoneUpdate};

#[derive(Subcommand)]
pub enum MilestoneCommands {
    /// Add a milestone to a product
    #[command(disable_version_flag = true)]
    Add {
        /// Product ID
        product: String,

        /// Milestone label (e.g. "Beta", "Certify")
        label: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD); omit for point-in-time milestones
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Version scope within the product
        #[arg(long)]
        version: Option<String>,

        /// Display category (e.g. alpha, beta, ga)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// List a product's milestones
    List {
        /// Product ID
        product: String,
    },

    /// Show milestone details
    Show {
        /// Milestone ID
        id: String,
    },

    /// Update a milestone; direct dependents are rescheduled
    Update {
        /// Milestone ID
        id: String,

        /// New label
        #[arg(long)]
        label: Option<String>,

        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// New display category
        #[arg(long = "type")]
        kind: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a milestone (its dependency edges stay)
    Remove {
        /// Milestone ID
        id: String,
    },
}

pub fn run(cmd: MilestoneCommands, output: &Output) -> Result<()> {
    match cmd {
        MilestoneCommands::Add {
            product,
            label,
            start,
            end,
            version,
            kind,
            color,
        } => add_milestone(output, &product, &label, start, end, version, kind, color),
        MilestoneCommands::List { product } => list_milestones(output, &product),
        MilestoneCommands::Show { id } => show_milestone(output, &id),
        MilestoneCommands::Update {
            id,
            label,
            start,
            end,
            kind,
            color,
        } => update_milestone(output, &id, label, start, end, kind, color),
        MilestoneCommands::Remove { id } => remove_milestone(output, &id),
    }
}

#[allow(clippy::too_many_arguments)]
fn add_milestone(
    output: &Output,
    product_str: &str,
    label: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    version: Option<String>,
    kind: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let product_id: ProductId = product_str.parse()?;

    let mut req = MilestoneCreate::new(product_id, label, start);
    req.end_date = end;
    req.product_version_id = match version {
        Some(raw) => Some(raw.parse::<VersionId>()?),
        None => None,
    };
    req.kind = kind;
    req.color = color;

    let milestone = project.milestone_service().create(&project.actor(), req)?;

    if output.is_json() {
        output.data(&milestone);
    } else {
        output.success(&format!(
            "Created milestone: {} - {} ({})",
            milestone.id, milestone.label, milestone.start_date
        ));
    }
    Ok(())
}

fn list_milestones(output: &Output, product_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let product_id: ProductId = product_str.parse()?;
    let milestones = project.milestone_service().list_by_product(&product_id)?;

    if output.is_json() {
        output.data(&milestones);
    } else if milestones.is_empty() {
        println!("No milestones for product {}", product_str);
    } else {
        println!("{:<12} {:<12} {:<12} LABEL", "ID", "START", "END");
        println!("{}", "-".repeat(60));
        for m in milestones {
            let end = m
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<12} {:<12} {}",
                m.id.to_string(),
                m.start_date.to_string(),
                end,
                m.label
            );
        }
    }
    Ok(())
}

fn show_milestone(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: MilestoneId = id_str.parse()?;
    let milestone = project.milestone_service().get(&id)?;

    if output.is_json() {
        output.data(&milestone);
    } else {
        print_milestone(&milestone);
    }
    Ok(())
}

fn update_milestone(
    output: &Output,
    id_str: &str,
    label: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    kind: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let id: MilestoneId = id_str.parse()?;

    let patch = MilestoneUpdate {
        label,
        start_date: start,
        end_date: end,
        kind,
        color,
        extra: None,
    };
    let milestone = project.milestone_service().update(&project.actor(), &id, patch)?;

    if output.is_json() {
        output.data(&milestone);
    } else {
        output.success(&format!("Updated milestone: {}", milestone.id));
    }
    Ok(())
}

fn remove_milestone(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: MilestoneId = id_str.parse()?;

    project.milestone_service().delete(&project.actor(), &id)?;
    output.success(&format!("Removed milestone: {}", id));
    Ok(())
}

fn print_milestone(m: &Milestone) {
    println!("ID:       {}", m.id);
    println!("Product:  {}", m.product_id);
    if let Some(version) = &m.product_version_id {
        println!("Version:  {}", version);
    }
    println!("Label:    {}", m.label);
    println!("Start:    {}", m.start_date);
    if let Some(end) = m.end_date {
        println!("End:      {}", end);
    }
    if !m.kind.is_empty() {
        println!("Type:     {}", m.kind);
    }
    if !m.color.is_empty() {
        println!("Color:    {}", m.color);
    }
    if !m.extra.is_empty() {
        for (key, value) in m.extra.iter() {
            println!("Extra:    {} = {}", key, value);
        }
    }
}
