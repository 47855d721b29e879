//! Milestone domain model
//!
//! A milestone is a dated point or interval on a product's roadmap, scoped to
//! a product and optionally to one of its versions. A handful of well-known
//! labels carry structural meaning for the rule validator; everything else
//! about a label is free text.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::id::{MilestoneId, ProductId, VersionId};

/// Label that marks a certification milestone
pub const LABEL_CERTIFY: &str = "Certify";

/// Label that marks a successful test run, prerequisite for certification
pub const LABEL_TESTED_SUCCESSFULLY: &str = "Tested Successfully";

/// Label that gates setting a product's lifecycle to active
pub const LABEL_PRICING_COMMITTEE_APPROVAL: &str = "Pricing Committee Approval";

/// Compares a label against a well-known label: surrounding whitespace is
/// ignored and the comparison is case-insensitive.
pub fn label_matches(label: &str, well_known: &str) -> bool {
    label.trim().eq_ignore_ascii_case(well_known)
}

/// Opaque key-value metadata attached by callers; no structural meaning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extra(HashMap<String, serde_json::Value>);

impl Extra {
    /// Creates empty metadata
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Gets a value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Sets a value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes a value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.0.remove(key)
    }

    /// Returns true if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all key-value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

/// A milestone on a product's roadmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier
    pub id: MilestoneId,

    /// Owning product
    pub product_id: ProductId,

    /// Optional finer scope within the product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version_id: Option<VersionId>,

    /// Human-readable label (e.g. "Beta", "Certify")
    pub label: String,

    /// When the milestone starts
    pub start_date: NaiveDate,

    /// When the milestone ends, for interval milestones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Display category (e.g. alpha, beta, ga, support); no structural meaning
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Display color; no structural meaning
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    /// Caller-defined metadata
    #[serde(default, skip_serializing_if = "Extra::is_empty")]
    pub extra: Extra,

    /// When the milestone was created
    pub created_at: DateTime<Utc>,

    /// When the milestone was last updated
    pub updated_at: DateTime<Utc>,
}

impl Milestone {
    /// Creates a new milestone for a product, starting on the given date
    pub fn new(product_id: ProductId, label: impl Into<String>, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        let label = label.into();
        Self {
            id: MilestoneId::new(&label, now),
            product_id,
            product_version_id: None,
            label,
            start_date,
            end_date: None,
            kind: String::new(),
            color: String::new(),
            extra: Extra::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if this is a "Certify" milestone
    pub fn is_certify(&self) -> bool {
        label_matches(&self.label, LABEL_CERTIFY)
    }

    /// Returns true if this is a "Tested Successfully" milestone
    pub fn is_tested_successfully(&self) -> bool {
        label_matches(&self.label, LABEL_TESTED_SUCCESSFULLY)
    }

    /// Returns true if this is a "Pricing Committee Approval" milestone
    pub fn is_pricing_committee_approval(&self) -> bool {
        label_matches(&self.label, LABEL_PRICING_COMMITTEE_APPROVAL)
    }

    /// Returns true if both milestones are scoped to the same product version:
    /// both unscoped, or both pointing at the same version.
    pub fn same_version_scope(&self, other: &Milestone) -> bool {
        self.product_version_id == other.product_version_id
    }

    /// Bumps the updated timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
