//! # Persistence Boundary
//!
//! The mutation services consume the store traits defined here and never
//! touch a database directly. Two implementations ship with the crate:
//!
//! | Store | Backing | Use |
//! |-------|---------|-----|
//! | [`SqliteStore`] | SQLite (WAL) in `.roadmap/roadmap.db` | durable projects |
//! | [`MemoryStore`] | `HashMap` behind an `RwLock` | tests, ephemeral runs |
//!
//! Dependency-graph traversal is store-backed by design: the engine asks
//! [`DependencyStore::list_by_source`] per hop instead of holding an
//! in-memory graph, so every hop observes the latest persisted state.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::domain::{
    Dependency, DependencyId, Milestone, MilestoneId, Product, ProductId,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Persistence for product records
pub trait ProductStore: Send + Sync {
    fn get(&self, id: &ProductId) -> Result<Product, StoreError>;
    fn list(&self) -> Result<Vec<Product>, StoreError>;
    fn create(&self, product: &Product) -> Result<(), StoreError>;
    fn update(&self, product: &Product) -> Result<(), StoreError>;
}

/// Persistence for milestone records
pub trait MilestoneStore: Send + Sync {
    fn get(&self, id: &MilestoneId) -> Result<Milestone, StoreError>;
    fn list_by_product(&self, product_id: &ProductId) -> Result<Vec<Milestone>, StoreError>;
    fn create(&self, milestone: &Milestone) -> Result<(), StoreError>;
    fn update(&self, milestone: &Milestone) -> Result<(), StoreError>;
    fn delete(&self, id: &MilestoneId) -> Result<(), StoreError>;
}

/// Persistence for dependency edges
pub trait DependencyStore: Send + Sync {
    fn get(&self, id: &DependencyId) -> Result<Dependency, StoreError>;
    fn list_all(&self) -> Result<Vec<Dependency>, StoreError>;
    /// Adjacency query: edges whose source is the given milestone
    fn list_by_source(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError>;
    /// Edges whose target is the given milestone
    fn list_by_target(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError>;
    fn create(&self, dependency: &Dependency) -> Result<(), StoreError>;
    fn delete(&self, id: &DependencyId) -> Result<(), StoreError>;
}
