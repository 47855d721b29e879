//! In-memory store
//!
//! `HashMap`-backed implementation of the store traits, used by service
//! tests and for ephemeral runs where nothing should touch disk.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Dependency, DependencyId, Milestone, MilestoneId, Product, ProductId};

use super::{DependencyStore, MilestoneStore, ProductStore, StoreError};

/// Ephemeral store holding everything in process memory
#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    milestones: RwLock<HashMap<MilestoneId, Milestone>>,
    dependencies: RwLock<HashMap<DependencyId, Dependency>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A poisoned lock only means another thread panicked mid-write; the maps
// themselves stay usable, so recover the guard instead of propagating.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl ProductStore for MemoryStore {
    fn get(&self, id: &ProductId) -> Result<Product, StoreError> {
        read(&self.products)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut list: Vec<_> = read(&self.products).values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    fn create(&self, product: &Product) -> Result<(), StoreError> {
        write(&self.products).insert(product.id.clone(), product.clone());
        Ok(())
    }

    fn update(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = write(&self.products);
        if !products.contains_key(&product.id) {
            return Err(StoreError::not_found("product", &product.id));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(())
    }
}

impl MilestoneStore for MemoryStore {
    fn get(&self, id: &MilestoneId) -> Result<Milestone, StoreError> {
        read(&self.milestones)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("milestone", id))
    }

    fn list_by_product(&self, product_id: &ProductId) -> Result<Vec<Milestone>, StoreError> {
        let mut list: Vec<_> = read(&self.milestones)
            .values()
            .filter(|m| &m.product_id == product_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(list)
    }

    fn create(&self, milestone: &Milestone) -> Result<(), StoreError> {
        write(&self.milestones).insert(milestone.id.clone(), milestone.clone());
        Ok(())
    }

    fn update(&self, milestone: &Milestone) -> Result<(), StoreError> {
        let mut milestones = write(&self.milestones);
        if !milestones.contains_key(&milestone.id) {
            return Err(StoreError::not_found("milestone", &milestone.id));
        }
        milestones.insert(milestone.id.clone(), milestone.clone());
        Ok(())
    }

    fn delete(&self, id: &MilestoneId) -> Result<(), StoreError> {
        write(&self.milestones)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("milestone", id))
    }
}

impl DependencyStore for MemoryStore {
    fn get(&self, id: &DependencyId) -> Result<Dependency, StoreError> {
        read(&self.dependencies)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("dependency", id))
    }

    fn list_all(&self) -> Result<Vec<Dependency>, StoreError> {
        let mut list: Vec<_> = read(&self.dependencies).values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    fn list_by_source(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError> {
        let mut list: Vec<_> = read(&self.dependencies)
            .values()
            .filter(|d| &d.source_milestone_id == milestone_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    fn list_by_target(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError> {
        let mut list: Vec<_> = read(&self.dependencies)
            .values()
            .filter(|d| &d.target_milestone_id == milestone_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    fn create(&self, dependency: &Dependency) -> Result<(), StoreError> {
        write(&self.dependencies).insert(dependency.id.clone(), dependency.clone());
        Ok(())
    }

    fn delete(&self, id: &DependencyId) -> Result<(), StoreError> {
        write(&self.dependencies)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("dependency", id))
    }
}
