//! SQLite store
//!
//! The durable store behind a project, at `.roadmap/roadmap.db`. One
//! connection in WAL mode serves all three store traits; schema versioning
//! rides on `PRAGMA user_version`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    Dependency, DependencyId, DependencyType, Extra, Milestone, MilestoneId, Product, ProductId,
};

use super::{DependencyStore, MilestoneStore, ProductStore, StoreError};

/// SQLite-backed store
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Schema version - bump when the schema changes to force rebuild
    const SCHEMA_VERSION: i32 = 1;

    /// Creates or opens the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        Self::from_connection(conn)
    }

    /// Creates the default store for a project root
    pub fn for_project(project_root: &Path) -> Result<Self, StoreError> {
        Self::open(project_root.join(".roadmap").join("roadmap.db"))
    }

    /// Opens an in-memory database (tests, ephemeral runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    // A poisoned mutex only means another thread panicked while holding the
    // connection; recover the guard rather than wedging every later call.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?
            .unwrap_or(0);

        if version == Self::SCHEMA_VERSION {
            return Ok(());
        }

        conn.execute_batch(
            "
            DROP TABLE IF EXISTS dependencies;
            DROP TABLE IF EXISTS milestones;
            DROP TABLE IF EXISTS products;

            CREATE TABLE products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                owner_id TEXT,
                lifecycle_status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE milestones (
                id TEXT PRIMARY KEY,
                product_id TEXT NOT NULL,
                product_version_id TEXT,
                label TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                kind TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL DEFAULT '',
                extra TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX idx_milestones_product ON milestones(product_id);

            CREATE TABLE dependencies (
                id TEXT PRIMARY KEY,
                source_milestone_id TEXT NOT NULL,
                target_milestone_id TEXT NOT NULL,
                dep_type TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX idx_dependencies_source ON dependencies(source_milestone_id);
            CREATE INDEX idx_dependencies_target ON dependencies(target_milestone_id);
            ",
        )?;

        conn.pragma_update(None, "user_version", Self::SCHEMA_VERSION)?;

        Ok(())
    }
}

/// Parses a TEXT column through `FromStr`, reporting failures as conversion
/// errors on the originating column.
fn parse_col<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let id: String = row.get(0)?;
    let owner_id: Option<String> = row.get(3)?;
    let lifecycle: String = row.get(4)?;

    Ok(Product {
        id: parse_col(0, &id)?,
        name: row.get(1)?,
        description: row.get(2)?,
        owner_id: owner_id.as_deref().map(|s| parse_col(3, s)).transpose()?,
        lifecycle_status: parse_col(4, &lifecycle)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn milestone_from_row(row: &Row<'_>) -> rusqlite::Result<Milestone> {
    let id: String = row.get(0)?;
    let product_id: String = row.get(1)?;
    let version_id: Option<String> = row.get(2)?;
    let extra: Option<String> = row.get(8)?;

    let extra = match extra {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
        None => Extra::new(),
    };

    Ok(Milestone {
        id: parse_col(0, &id)?,
        product_id: parse_col(1, &product_id)?,
        product_version_id: version_id.as_deref().map(|s| parse_col(2, s)).transpose()?,
        label: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        kind: row.get(6)?,
        color: row.get(7)?,
        extra,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn dependency_from_row(row: &Row<'_>) -> rusqlite::Result<Dependency> {
    let id: String = row.get(0)?;
    let source: String = row.get(1)?;
    let target: String = row.get(2)?;
    let dep_type: String = row.get(3)?;

    Ok(Dependency {
        id: parse_col(0, &id)?,
        source_milestone_id: parse_col(1, &source)?,
        target_milestone_id: parse_col(2, &target)?,
        dep_type: parse_col::<DependencyType>(3, &dep_type)?,
        created_at: row.get(4)?,
    })
}

fn extra_to_json(extra: &Extra) -> Result<Option<String>, StoreError> {
    if extra.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(extra)?))
    }
}

const PRODUCT_COLS: &str = "id, name, description, owner_id, lifecycle_status, created_at, updated_at";
const MILESTONE_COLS: &str = "id, product_id, product_version_id, label, start_date, end_date, \
                              kind, color, extra, created_at, updated_at";
const DEPENDENCY_COLS: &str =
    "id, source_milestone_id, target_milestone_id, dep_type, created_at";

impl ProductStore for SqliteStore {
    fn get(&self, id: &ProductId) -> Result<Product, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"),
                params![id.to_string()],
                product_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {PRODUCT_COLS} FROM products ORDER BY created_at"))?;
        let rows = stmt.query_map([], product_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create(&self, product: &Product) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO products (id, name, description, owner_id, lifecycle_status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.owner_id.as_ref().map(|o| o.to_string()),
                product.lifecycle_status.as_str(),
                product.created_at,
                product.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, product: &Product) -> Result<(), StoreError> {
        let changed = self.conn().execute(
            "UPDATE products SET name = ?2, description = ?3, owner_id = ?4,
                    lifecycle_status = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.owner_id.as_ref().map(|o| o.to_string()),
                product.lifecycle_status.as_str(),
                product.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("product", &product.id));
        }
        Ok(())
    }
}

impl MilestoneStore for SqliteStore {
    fn get(&self, id: &MilestoneId) -> Result<Milestone, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {MILESTONE_COLS} FROM milestones WHERE id = ?1"),
                params![id.to_string()],
                milestone_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("milestone", id))
    }

    fn list_by_product(&self, product_id: &ProductId) -> Result<Vec<Milestone>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MILESTONE_COLS} FROM milestones WHERE product_id = ?1 ORDER BY start_date, id"
        ))?;
        let rows = stmt.query_map(params![product_id.to_string()], milestone_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create(&self, milestone: &Milestone) -> Result<(), StoreError> {
        let extra = extra_to_json(&milestone.extra)?;
        self.conn().execute(
            "INSERT INTO milestones (id, product_id, product_version_id, label, start_date,
                    end_date, kind, color, extra, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                milestone.id.to_string(),
                milestone.product_id.to_string(),
                milestone.product_version_id.as_ref().map(|v| v.to_string()),
                milestone.label,
                milestone.start_date,
                milestone.end_date,
                milestone.kind,
                milestone.color,
                extra,
                milestone.created_at,
                milestone.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, milestone: &Milestone) -> Result<(), StoreError> {
        let extra = extra_to_json(&milestone.extra)?;
        let changed = self.conn().execute(
            "UPDATE milestones SET product_id = ?2, product_version_id = ?3, label = ?4,
                    start_date = ?5, end_date = ?6, kind = ?7, color = ?8, extra = ?9,
                    updated_at = ?10
             WHERE id = ?1",
            params![
                milestone.id.to_string(),
                milestone.product_id.to_string(),
                milestone.product_version_id.as_ref().map(|v| v.to_string()),
                milestone.label,
                milestone.start_date,
                milestone.end_date,
                milestone.kind,
                milestone.color,
                extra,
                milestone.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("milestone", &milestone.id));
        }
        Ok(())
    }

    fn delete(&self, id: &MilestoneId) -> Result<(), StoreError> {
        let changed = self.conn().execute(
            "DELETE FROM milestones WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("milestone", id));
        }
        Ok(())
    }
}

impl DependencyStore for SqliteStore {
    fn get(&self, id: &DependencyId) -> Result<Dependency, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {DEPENDENCY_COLS} FROM dependencies WHERE id = ?1"),
                params![id.to_string()],
                dependency_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("dependency", id))
    }

    fn list_all(&self) -> Result<Vec<Dependency>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPENDENCY_COLS} FROM dependencies ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([], dependency_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn list_by_source(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPENDENCY_COLS} FROM dependencies
             WHERE source_milestone_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map(params![milestone_id.to_string()], dependency_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn list_by_target(&self, milestone_id: &MilestoneId) -> Result<Vec<Dependency>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPENDENCY_COLS} FROM dependencies
             WHERE target_milestone_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map(params![milestone_id.to_string()], dependency_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create(&self, dependency: &Dependency) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO dependencies (id, source_milestone_id, target_milestone_id, dep_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                dependency.id.to_string(),
                dependency.source_milestone_id.to_string(),
                dependency.target_milestone_id.to_string(),
                dependency.dep_type.label(),
                dependency.created_at,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &DependencyId) -> Result<(), StoreError> {
        let changed = self.conn().execute(
            "DELETE FROM dependencies WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("dependency", id));
        }
        Ok(())
    }
}
