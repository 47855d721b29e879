//! Roadmap CLI - Local-first product roadmap and milestone planning
//!
//! Products carry milestones on a timeline; milestones are linked by typed
//! temporal dependencies (finish-to-start, start-to-start, finish-to-finish).
//! Editing a milestone's dates reschedules its direct dependents, and label
//! rules guard milestones like "Certify" that require prerequisites.

pub mod cli;
pub mod config;
pub mod domain;
pub mod project;
pub mod service;
pub mod store;

pub use domain::{
    Dependency, DependencyId, DependencyType, LifecycleStatus, Milestone, MilestoneId, Product,
    ProductId, Role, UserId,
};
