//! Domain models for the roadmap
//!
//! Contains the core business logic without any I/O concerns.

mod dependency;
mod id;
mod milestone;
mod product;
pub mod rules;

pub use dependency::{Dependency, DependencyType, DependencyTypeError};
pub use id::{DependencyId, IdError, MilestoneId, ProductId, UserId, VersionId};
pub use milestone::{
    label_matches, Extra, Milestone, LABEL_CERTIFY, LABEL_PRICING_COMMITTEE_APPROVAL,
    LABEL_TESTED_SUCCESSFULLY,
};
pub use product::{LifecycleStatus, Product, Role};
pub use rules::RuleViolation;
