//! Project management
//!
//! Handles project initialization and wires stores into services.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::Config;
use crate::service::{Actor, DependencyService, MilestoneService, ProductService, Rescheduler};
use crate::store::{DependencyStore, MilestoneStore, ProductStore, SqliteStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Not in a roadmap project. Run 'roadmap init' first.")]
    NotInProject,
}

/// An open roadmap project
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: Config,
    store: Arc<SqliteStore>,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let roadmap_dir = root.join(".roadmap");

        if !roadmap_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;
        let store = Arc::new(
            SqliteStore::for_project(&root)
                .with_context(|| format!("Failed to open database in {}", roadmap_dir.display()))?,
        );

        Ok(Self {
            root,
            config,
            store,
        })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let roadmap_dir = root.join(".roadmap");

        if roadmap_dir.is_dir() {
            return Err(ProjectError::AlreadyExists(root).into());
        }

        fs::create_dir_all(&roadmap_dir).with_context(|| {
            format!(
                "Failed to create .roadmap directory: {}",
                roadmap_dir.display()
            )
        })?;

        let config_path = roadmap_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Roadmap CLI configuration

# Acting user for mutations. The name defaults to $ROADMAP_USER, then $USER.
# Roles: superadmin, admin, owner, user
[actor]
role = "admin"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // WAL sidecars are transient; the database itself is the source of truth.
        let gitignore_path = roadmap_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "roadmap.db-wal\nroadmap.db-shm\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .roadmap directory path
    pub fn roadmap_dir(&self) -> PathBuf {
        self.root.join(".roadmap")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the configured acting user
    pub fn actor(&self) -> Actor {
        self.config.project.actor.effective_actor()
    }

    pub fn product_store(&self) -> Arc<dyn ProductStore> {
        self.store.clone()
    }

    pub fn milestone_store(&self) -> Arc<dyn MilestoneStore> {
        self.store.clone()
    }

    pub fn dependency_store(&self) -> Arc<dyn DependencyStore> {
        self.store.clone()
    }

    pub fn product_service(&self) -> ProductService {
        ProductService::new(self.product_store(), self.milestone_store())
    }

    pub fn milestone_service(&self) -> MilestoneService {
        let rescheduler = Rescheduler::new(self.milestone_store(), self.dependency_store());
        MilestoneService::new(self.product_store(), self.milestone_store(), rescheduler)
    }

    pub fn dependency_service(&self) -> DependencyService {
        DependencyService::new(self.milestone_store(), self.dependency_store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_layout() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.roadmap_dir().is_dir());
        assert!(project.roadmap_dir().join("config.toml").exists());
        assert!(project.roadmap_dir().join("roadmap.db").exists());
    }

    #[test]
    fn init_refuses_an_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let err = Project::init(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn open_requires_initialization() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());
    }
}
