//! Typed temporal dependencies between milestones
//!
//! A dependency is a directed edge from a source milestone to a target
//! milestone. The type names the classic project-scheduling relationship
//! saying which date pair of the two is meant to stay aligned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::{DependencyId, MilestoneId};

#[derive(Debug, Error, PartialEq)]
#[error("Invalid dependency type '{0}': expected FS, SS or FF")]
pub struct DependencyTypeError(String);

/// Type of temporal dependency between two milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DependencyType {
    /// The target's start tracks the source's finish
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    /// The target's start tracks the source's start
    #[serde(rename = "SS")]
    StartToStart,
    /// The target's finish tracks the source's finish
    #[serde(rename = "FF")]
    FinishToFinish,
}

impl DependencyType {
    /// Returns the wire label for the dependency type
    pub fn label(&self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DependencyType {
    type Err = DependencyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(DependencyType::FinishToStart),
            "SS" => Ok(DependencyType::StartToStart),
            "FF" => Ok(DependencyType::FinishToFinish),
            _ => Err(DependencyTypeError(s.to_string())),
        }
    }
}

/// A directed typed edge between two milestones
///
/// Edges live independently of the milestones they reference: deleting an
/// endpoint milestone does not remove the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Unique identifier
    pub id: DependencyId,

    /// The milestone whose dates drive the relationship
    pub source_milestone_id: MilestoneId,

    /// The milestone that follows the source
    pub target_milestone_id: MilestoneId,

    /// Which date pair stays aligned
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

impl Dependency {
    /// Creates a new edge between two milestones
    pub fn new(
        source_milestone_id: MilestoneId,
        target_milestone_id: MilestoneId,
        dep_type: DependencyType,
    ) -> Self {
        let now = Utc::now();
        let seed = format!("{}>{}", source_milestone_id, target_milestone_id);
        Self {
            id: DependencyId::new(&seed, now),
            source_milestone_id,
            target_milestone_id,
            dep_type,
            created_at: now,
        }
    }

    /// Returns true if the edge touches the given milestone on either end
    pub fn touches(&self, milestone_id: &MilestoneId) -> bool {
        &self.source_milestone_id == milestone_id || &self.target_milestone_id == milestone_id
    }
}
