//! Product CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{LifecycleStatus, Product, ProductId, UserId};
use crate::project::Project;

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Add a product
    Add {
        /// Product name
        name: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },

    /// List products
    List,

    /// Show product details
    Show {
        /// Product ID
        id: String,
    },

    /// Set or clear the product owner
    Owner {
        /// Product ID
        id: String,

        /// Owner user ID (omit to clear)
        user: Option<String>,
    },

    /// Change the lifecycle status (active, not_active, suspend, end_of_roadmap)
    Lifecycle {
        /// Product ID
        id: String,

        /// New status
        status: String,
    },
}

pub fn run(cmd: ProductCommands, output: &Output) -> Result<()> {
    match cmd {
        ProductCommands::Add { name, description } => add_product(output, &name, description),
        ProductCommands::List => list_products(output),
        ProductCommands::Show { id } => show_product(output, &id),
        ProductCommands::Owner { id, user } => set_owner(output, &id, user.as_deref()),
        ProductCommands::Lifecycle { id, status } => set_lifecycle(output, &id, &status),
    }
}

fn add_product(output: &Output, name: &str, description: Option<String>) -> Result<()> {
    let project = Project::open_current()?;
    let service = project.product_service();

    let product = service.create(&project.actor(), name, description)?;

    if output.is_json() {
        output.data(&product);
    } else {
        output.success(&format!("Created product: {} - {}", product.id, product.name));
    }
    Ok(())
}

fn list_products(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let products = project.product_service().list()?;

    if output.is_json() {
        output.data(&products);
    } else if products.is_empty() {
        println!("No products");
    } else {
        println!("{:<12} {:<16} {:<10} NAME", "ID", "LIFECYCLE", "OWNER");
        println!("{}", "-".repeat(60));
        for product in products {
            let owner = product
                .owner_id
                .as_ref()
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<16} {:<10} {}",
                product.id.to_string(),
                product.lifecycle_status.as_str(),
                owner,
                product.name
            );
        }
    }
    Ok(())
}

fn show_product(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: ProductId = id_str.parse()?;
    let product = project.product_service().get(&id)?;

    if output.is_json() {
        output.data(&product);
    } else {
        print_product(&product);
    }
    Ok(())
}

fn set_owner(output: &Output, id_str: &str, user_str: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let id: ProductId = id_str.parse()?;
    let owner_id = match user_str {
        Some(raw) => Some(raw.parse::<UserId>()?),
        None => None,
    };
    let cleared = owner_id.is_none();

    let product = project
        .product_service()
        .set_owner(&project.actor(), &id, owner_id)?;

    if output.is_json() {
        output.data(&product);
    } else if cleared {
        output.success(&format!("Cleared owner of {}", product.id));
    } else {
        output.success(&format!(
            "Set owner of {} to {}",
            product.id,
            product.owner_id.as_ref().map(|o| o.to_string()).unwrap_or_default()
        ));
    }
    Ok(())
}

fn set_lifecycle(output: &Output, id_str: &str, status_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: ProductId = id_str.parse()?;
    let status: LifecycleStatus = status_str.parse()?;

    let product = project
        .product_service()
        .set_lifecycle(&project.actor(), &id, status)?;

    if output.is_json() {
        output.data(&product);
    } else {
        output.success(&format!(
            "Product {} is now {}",
            product.id,
            product.lifecycle_status.as_str()
        ));
    }
    Ok(())
}

fn print_product(product: &Product) {
    println!("ID:          {}", product.id);
    println!("Name:        {}", product.name);
    if !product.description.is_empty() {
        println!("Description: {}", product.description);
    }
    println!("Lifecycle:   {}", product.lifecycle_status.as_str());
    if let Some(owner) = &product.owner_id {
        println!("Owner:       {}", owner);
    }
    println!("Created:     {}", product.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:     {}", product.updated_at.format("%Y-%m-%d %H:%M"));
}
