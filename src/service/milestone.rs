//! Milestone mutations: create, update, delete, plus reads.
//!
//! Every mutation runs the same pipeline: resolve the product, authorize the
//! actor, validate the rules, persist. Updates additionally hand the saved
//! milestone to the rescheduler so direct dependents follow its dates.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{rules, Extra, Milestone, MilestoneId, ProductId, VersionId};
use crate::service::{authorize_product_mutation, Actor, Rescheduler, ServiceError};
use crate::store::{MilestoneStore, ProductStore};

/// Fields for a new milestone
#[derive(Debug, Clone)]
pub struct MilestoneCreate {
    pub product_id: ProductId,
    pub product_version_id: Option<VersionId>,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub extra: Option<Extra>,
}

impl MilestoneCreate {
    pub fn new(product_id: ProductId, label: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            product_id,
            product_version_id: None,
            label: label.into(),
            start_date,
            end_date: None,
            kind: None,
            color: None,
            extra: None,
        }
    }
}

/// Partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct MilestoneUpdate {
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub extra: Option<Extra>,
}

pub struct MilestoneService {
    products: Arc<dyn ProductStore>,
    milestones: Arc<dyn MilestoneStore>,
    rescheduler: Rescheduler,
}

impl MilestoneService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        milestones: Arc<dyn MilestoneStore>,
        rescheduler: Rescheduler,
    ) -> Self {
        Self {
            products,
            milestones,
            rescheduler,
        }
    }

    pub fn get(&self, id: &MilestoneId) -> Result<Milestone, ServiceError> {
        Ok(self.milestones.get(id)?)
    }

    pub fn list_by_product(&self, product_id: &ProductId) -> Result<Vec<Milestone>, ServiceError> {
        Ok(self.milestones.list_by_product(product_id)?)
    }

    pub fn create(&self, actor: &Actor, req: MilestoneCreate) -> Result<Milestone, ServiceError> {
        let product = self.products.get(&req.product_id)?;
        authorize_product_mutation(actor, &product)?;

        let mut milestone = Milestone::new(req.product_id, req.label, req.start_date);
        milestone.product_version_id = req.product_version_id;
        milestone.end_date = req.end_date;
        if let Some(kind) = req.kind {
            milestone.kind = kind;
        }
        if let Some(color) = req.color {
            milestone.color = color;
        }
        if let Some(extra) = req.extra {
            milestone.extra = extra;
        }

        rules::check_date_order(&milestone)?;
        let siblings = self.milestones.list_by_product(&milestone.product_id)?;
        rules::check_certify_prerequisite(&milestone, &siblings)?;

        self.milestones.create(&milestone)?;
        info!(
            milestone = %milestone.id,
            product = %milestone.product_id,
            actor = %actor.user_id,
            label = %milestone.label,
            "milestone created"
        );
        Ok(milestone)
    }

    pub fn update(
        &self,
        actor: &Actor,
        id: &MilestoneId,
        patch: MilestoneUpdate,
    ) -> Result<Milestone, ServiceError> {
        let mut milestone = self.milestones.get(id)?;
        let product = self.products.get(&milestone.product_id)?;
        authorize_product_mutation(actor, &product)?;

        if let Some(label) = patch.label {
            milestone.label = label;
        }
        if let Some(start_date) = patch.start_date {
            milestone.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            milestone.end_date = Some(end_date);
        }
        if let Some(kind) = patch.kind {
            milestone.kind = kind;
        }
        if let Some(color) = patch.color {
            milestone.color = color;
        }
        if let Some(extra) = patch.extra {
            milestone.extra = extra;
        }

        rules::check_date_order(&milestone)?;
        let siblings = self.milestones.list_by_product(&milestone.product_id)?;
        rules::check_certify_prerequisite(&milestone, &siblings)?;

        milestone.touch();
        self.milestones.update(&milestone)?;

        // Dependents follow the saved milestone; their failures never undo it.
        let shifted = self.rescheduler.reschedule_dependents(&milestone);
        info!(
            milestone = %milestone.id,
            actor = %actor.user_id,
            shifted,
            "milestone updated"
        );
        Ok(milestone)
    }

    /// Removes the milestone. Rules are not re-checked, so deleting a
    /// "Tested Successfully" milestone can leave a now-unjustified Certify
    /// behind; dependencies pointing at the milestone also stay in place.
    pub fn delete(&self, actor: &Actor, id: &MilestoneId) -> Result<(), ServiceError> {
        let milestone = self.milestones.get(id)?;
        let product = self.products.get(&milestone.product_id)?;
        authorize_product_mutation(actor, &product)?;

        self.milestones.delete(id)?;
        info!(milestone = %id, actor = %actor.user_id, "milestone deleted");
        Ok(())
    }
}
