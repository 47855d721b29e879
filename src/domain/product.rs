//! Product records and caller roles
//!
//! The scheduling core only needs enough of a product to evaluate the
//! mutation gate: its lifecycle status and its designated owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::{ProductId, UserId};

#[derive(Debug, Error, PartialEq)]
#[error("Invalid {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Lifecycle state of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// On the roadmap and open for milestone edits by its owner
    Active,
    /// Not yet live
    #[default]
    NotActive,
    /// Temporarily frozen
    Suspend,
    /// No further roadmap work planned
    EndOfRoadmap,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Active => "active",
            LifecycleStatus::NotActive => "not_active",
            LifecycleStatus::Suspend => "suspend",
            LifecycleStatus::EndOfRoadmap => "end_of_roadmap",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleStatus::Active)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(LifecycleStatus::Active),
            "not_active" => Ok(LifecycleStatus::NotActive),
            "suspend" => Ok(LifecycleStatus::Suspend),
            "end_of_roadmap" => Ok(LifecycleStatus::EndOfRoadmap),
            _ => Err(ParseEnumError {
                kind: "lifecycle status",
                value: s.to_string(),
            }),
        }
    }
}

/// Caller role, ordered user < owner < admin < superadmin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Admin,
    #[default]
    Owner,
    User,
}

impl Role {
    /// Returns true for admin or superadmin
    pub fn is_admin_or_above(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            "user" => Ok(Role::User),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// A product owning a set of milestones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Designated owner, allowed to edit milestones while the product is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,

    /// Lifecycle state
    pub lifecycle_status: LifecycleStatus,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product, not yet active and without an owner
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let name = name.into();
        Self {
            id: ProductId::new(&name, now),
            name,
            description: String::new(),
            owner_id: None,
            lifecycle_status: LifecycleStatus::NotActive,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the given user is the designated owner
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id.as_ref() == Some(user_id)
    }

    /// Bumps the updated timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_is_not_active() {
        let p = Product::new("Gadget");
        assert_eq!(p.lifecycle_status, LifecycleStatus::NotActive);
        assert!(p.owner_id.is_none());
    }

    #[test]
    fn lifecycle_status_parsing() {
        assert_eq!("active".parse(), Ok(LifecycleStatus::Active));
        assert_eq!(" End_Of_Roadmap ".parse(), Ok(LifecycleStatus::EndOfRoadmap));
        assert!("retired".parse::<LifecycleStatus>().is_err());
    }

    #[test]
    fn role_hierarchy() {
        assert!(Role::Admin.is_admin_or_above());
        assert!(Role::Superadmin.is_admin_or_above());
        assert!(!Role::Owner.is_admin_or_above());
        assert!(!Role::User.is_admin_or_above());
    }

    #[test]
    fn role_parsing_roundtrip() {
        for role in [Role::Superadmin, Role::Admin, Role::Owner, Role::User] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn ownership_check() {
        let mut p = Product::new("Gadget");
        let alice = UserId::new("alice", Utc::now());
        let bob = UserId::new("bob", Utc::now());

        assert!(!p.is_owned_by(&alice));

        p.owner_id = Some(alice.clone());
        assert!(p.is_owned_by(&alice));
        assert!(!p.is_owned_by(&bob));
    }

    #[test]
    fn serde_roundtrip() {
        let mut p = Product::new("Gadget");
        p.owner_id = Some(UserId::new("alice", Utc::now()));
        p.lifecycle_status = LifecycleStatus::Active;

        let json = serde_json::to_string(&p).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();

        assert_eq!(p, parsed);
    }
}
