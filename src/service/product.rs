//! Product administration: creation, ownership and lifecycle changes.
//!
//! All product mutations are reserved for admins. The lifecycle transition
//! to active is additionally gated on the roadmap carrying a "Pricing
//! Committee Approval" milestone.

use std::sync::Arc;

use tracing::info;

use crate::domain::{rules, LifecycleStatus, Product, ProductId, UserId};
use crate::service::{Actor, ServiceError};
use crate::store::{MilestoneStore, ProductStore};

pub struct ProductService {
    products: Arc<dyn ProductStore>,
    milestones: Arc<dyn MilestoneStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>, milestones: Arc<dyn MilestoneStore>) -> Self {
        Self {
            products,
            milestones,
        }
    }

    pub fn get(&self, id: &ProductId) -> Result<Product, ServiceError> {
        Ok(self.products.get(id)?)
    }

    pub fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.list()?)
    }

    pub fn create(
        &self,
        actor: &Actor,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Product, ServiceError> {
        require_admin(actor)?;

        let mut product = Product::new(name);
        if let Some(description) = description {
            product.description = description;
        }
        self.products.create(&product)?;
        info!(product = %product.id, actor = %actor.user_id, name = %product.name, "product created");
        Ok(product)
    }

    pub fn set_owner(
        &self,
        actor: &Actor,
        id: &ProductId,
        owner_id: Option<UserId>,
    ) -> Result<Product, ServiceError> {
        require_admin(actor)?;

        let mut product = self.products.get(id)?;
        product.owner_id = owner_id;
        product.touch();
        self.products.update(&product)?;
        info!(product = %product.id, actor = %actor.user_id, "product owner changed");
        Ok(product)
    }

    pub fn set_lifecycle(
        &self,
        actor: &Actor,
        id: &ProductId,
        status: LifecycleStatus,
    ) -> Result<Product, ServiceError> {
        require_admin(actor)?;

        let mut product = self.products.get(id)?;
        if status.is_active() && !product.lifecycle_status.is_active() {
            let milestones = self.milestones.list_by_product(id)?;
            if !rules::has_pricing_committee_approval(&milestones) {
                return Err(ServiceError::PricingApprovalRequired);
            }
        }

        product.lifecycle_status = status;
        product.touch();
        self.products.update(&product)?;
        info!(
            product = %product.id,
            actor = %actor.user_id,
            status = product.lifecycle_status.as_str(),
            "product lifecycle changed"
        );
        Ok(product)
    }
}

fn require_admin(actor: &Actor) -> Result<(), ServiceError> {
    if actor.role.is_admin_or_above() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Milestone, Role, LABEL_PRICING_COMMITTEE_APPROVAL};
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, Utc};

    struct Harness {
        milestones: Arc<dyn MilestoneStore>,
        service: ProductService,
        admin: Actor,
    }

    fn setup() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let products: Arc<dyn ProductStore> = store.clone();
        let milestones: Arc<dyn MilestoneStore> = store.clone();
        Harness {
            milestones: milestones.clone(),
            service: ProductService::new(products, milestones),
            admin: Actor::new(UserId::new("alice", Utc::now()), Role::Admin),
        }
    }

    #[test]
    fn only_admins_touch_products() {
        let h = setup();
        for role in [Role::Owner, Role::User] {
            let actor = Actor::new(UserId::new("bob", Utc::now()), role);
            assert!(matches!(
                h.service.create(&actor, "Gadget", None),
                Err(ServiceError::Forbidden)
            ));
        }
        h.service.create(&h.admin, "Gadget", None).unwrap();
    }

    #[test]
    fn activation_requires_pricing_committee_approval() {
        let h = setup();
        let product = h.service.create(&h.admin, "Gadget", None).unwrap();

        assert!(matches!(
            h.service
                .set_lifecycle(&h.admin, &product.id, LifecycleStatus::Active),
            Err(ServiceError::PricingApprovalRequired)
        ));

        let approval = Milestone::new(
            product.id.clone(),
            LABEL_PRICING_COMMITTEE_APPROVAL,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        h.milestones.create(&approval).unwrap();

        let active = h
            .service
            .set_lifecycle(&h.admin, &product.id, LifecycleStatus::Active)
            .unwrap();
        assert!(active.lifecycle_status.is_active());
    }

    #[test]
    fn deactivation_is_never_gated() {
        let h = setup();
        let product = h.service.create(&h.admin, "Gadget", None).unwrap();

        let suspended = h
            .service
            .set_lifecycle(&h.admin, &product.id, LifecycleStatus::Suspend)
            .unwrap();
        assert_eq!(suspended.lifecycle_status, LifecycleStatus::Suspend);
    }

    #[test]
    fn set_owner_records_and_clears() {
        let h = setup();
        let product = h.service.create(&h.admin, "Gadget", None).unwrap();
        let owner = UserId::new("bob", Utc::now());

        let owned = h
            .service
            .set_owner(&h.admin, &product.id, Some(owner.clone()))
            .unwrap();
        assert!(owned.is_owned_by(&owner));

        let cleared = h.service.set_owner(&h.admin, &product.id, None).unwrap();
        assert_eq!(cleared.owner_id, None);
    }
}
