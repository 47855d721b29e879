//! Dependency edge mutations and queries.
//!
//! Edges only require that both endpoints exist at creation time. Self-loops
//! and duplicate edges are accepted, and deleting a milestone leaves its
//! edges behind, so queries must tolerate dangling endpoints.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Dependency, DependencyId, DependencyType, MilestoneId, ProductId};
use crate::service::{Actor, ServiceError};
use crate::store::{DependencyStore, MilestoneStore};

/// Fields for a new dependency edge
#[derive(Debug, Clone)]
pub struct DependencyCreate {
    pub source_milestone_id: MilestoneId,
    pub target_milestone_id: MilestoneId,
    pub dep_type: DependencyType,
}

pub struct DependencyService {
    milestones: Arc<dyn MilestoneStore>,
    dependencies: Arc<dyn DependencyStore>,
}

impl DependencyService {
    pub fn new(milestones: Arc<dyn MilestoneStore>, dependencies: Arc<dyn DependencyStore>) -> Self {
        Self {
            milestones,
            dependencies,
        }
    }

    pub fn get(&self, id: &DependencyId) -> Result<Dependency, ServiceError> {
        Ok(self.dependencies.get(id)?)
    }

    /// Lists edges, optionally restricted to those touching a product's
    /// milestones. Edges whose endpoints were since deleted still appear in
    /// the unfiltered listing.
    pub fn list(&self, product_id: Option<&ProductId>) -> Result<Vec<Dependency>, ServiceError> {
        let all = self.dependencies.list_all()?;
        let Some(product_id) = product_id else {
            return Ok(all);
        };

        let milestones = self.milestones.list_by_product(product_id)?;
        Ok(all
            .into_iter()
            .filter(|d| milestones.iter().any(|m| d.touches(&m.id)))
            .collect())
    }

    /// Lists edges pointing at one milestone
    pub fn list_by_target(
        &self,
        milestone_id: &MilestoneId,
    ) -> Result<Vec<Dependency>, ServiceError> {
        Ok(self.dependencies.list_by_target(milestone_id)?)
    }

    pub fn create(&self, actor: &Actor, req: DependencyCreate) -> Result<Dependency, ServiceError> {
        // Both endpoints must exist; nothing else about the pair is checked.
        self.milestones.get(&req.source_milestone_id)?;
        self.milestones.get(&req.target_milestone_id)?;

        let dependency = Dependency::new(
            req.source_milestone_id,
            req.target_milestone_id,
            req.dep_type,
        );
        self.dependencies.create(&dependency)?;
        info!(
            dependency = %dependency.id,
            source = %dependency.source_milestone_id,
            target = %dependency.target_milestone_id,
            dep_type = %dependency.dep_type,
            actor = %actor.user_id,
            "dependency created"
        );
        Ok(dependency)
    }

    pub fn delete(&self, actor: &Actor, id: &DependencyId) -> Result<(), ServiceError> {
        self.dependencies.get(id)?;
        self.dependencies.delete(id)?;
        info!(dependency = %id, actor = %actor.user_id, "dependency deleted");
        Ok(())
    }
}
