//! Configuration handling for Roadmap CLI
//!
//! Configuration is stored in `.roadmap/config.toml` (project) and
//! `~/.config/roadmap/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::DateTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Role, UserId};
use crate::service::Actor;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Who mutations run as when no explicit actor is given
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Stable user id; derived from the name when absent
    pub id: Option<String>,

    /// Actor name (defaults to $ROADMAP_USER, then $USER)
    pub name: Option<String>,

    /// Role the actor holds on this roadmap
    pub role: Role,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            // A local roadmap has a single operator; treat them as admin.
            role: Role::Admin,
        }
    }
}

impl ActorConfig {
    /// Gets the effective actor name from config, environment, or defaults
    pub fn effective_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| std::env::var("ROADMAP_USER").ok())
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    /// Resolves the configured actor. Without an explicit id the name is
    /// hashed at a fixed timestamp so the id stays stable across runs.
    pub fn effective_actor(&self) -> Actor {
        let user_id = self
            .id
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| UserId::new(&self.effective_name(), DateTime::UNIX_EPOCH));
        Actor::new(user_id, self.role)
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Acting user for mutations
    pub actor: ActorConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "roadmap", "roadmap-cli")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        let project_root = Self::find_project_root();

        match project_root {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".roadmap").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `.roadmap/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let roadmap_dir = current.join(".roadmap");
            if roadmap_dir.is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a roadmap project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_actor_is_an_admin() {
        let config = ProjectConfig::default();
        let actor = config.actor.effective_actor();
        assert_eq!(actor.role, Role::Admin);
    }

    #[test]
    fn actor_id_is_stable_across_resolutions() {
        let config = ActorConfig {
            name: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_actor().user_id,
            config.effective_actor().user_id
        );
    }

    #[test]
    fn explicit_actor_id_wins() {
        let id = UserId::new("alice", chrono::Utc::now());
        let config = ActorConfig {
            id: Some(id.to_string()),
            name: Some("someone-else".to_string()),
            role: Role::Owner,
        };
        let actor = config.effective_actor();
        assert_eq!(actor.user_id, id);
        assert_eq!(actor.role, Role::Owner);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
[actor]
name = "alice"
role = "owner"
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.actor.name.as_deref(), Some("alice"));
        assert_eq!(config.actor.role, Role::Owner);
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(!config.is_in_project());
    }
}
