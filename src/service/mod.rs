//! Mutation services
//!
//! Orchestrate authorization, rule validation, persistence and dependent
//! rescheduling for milestones, dependencies and products. Services talk to
//! the store traits only; presentation and audit concerns stay outside.

mod dependency;
mod milestone;
mod product;
mod reschedule;

pub use dependency::{DependencyCreate, DependencyService};
pub use milestone::{MilestoneCreate, MilestoneService, MilestoneUpdate};
pub use product::ProductService;
pub use reschedule::Rescheduler;

use thiserror::Error;

use crate::domain::{Product, Role, RuleViolation, UserId};
use crate::store::StoreError;

/// The user a mutation is performed as
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("forbidden")]
    Forbidden,

    #[error("end_date must be greater than or equal to start_date")]
    DateOrder,

    #[error(
        "a Certify milestone cannot exist without a Tested Successfully milestone \
         for the same product (and version)"
    )]
    CertifyPrerequisite,

    #[error("product cannot be set to active until it has a Pricing Committee Approval milestone")]
    PricingApprovalRequired,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Store(other),
        }
    }
}

impl From<RuleViolation> for ServiceError {
    fn from(violation: RuleViolation) -> Self {
        match violation {
            RuleViolation::DateOrder => ServiceError::DateOrder,
            RuleViolation::CertifyPrerequisite => ServiceError::CertifyPrerequisite,
        }
    }
}

/// The gate in front of every milestone mutation: admins pass, the product's
/// designated owner passes while the product is active, everyone else is
/// rejected.
pub(crate) fn authorize_product_mutation(
    actor: &Actor,
    product: &Product,
) -> Result<(), ServiceError> {
    match actor.role {
        Role::Superadmin | Role::Admin => Ok(()),
        Role::Owner => {
            if !product.lifecycle_status.is_active() {
                return Err(ServiceError::Forbidden);
            }
            if !product.is_owned_by(&actor.user_id) {
                return Err(ServiceError::Forbidden);
            }
            Ok(())
        }
        Role::User => Err(ServiceError::Forbidden),
    }
}
