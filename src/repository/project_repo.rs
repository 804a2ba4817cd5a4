// ==========================================
// DUPA Estimator - Project repository
// ==========================================

use crate::domain::project::{HaulingConfig, Project};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>>;
}

pub struct SqliteProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProjectRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn upsert(&self, project: &Project) -> RepositoryResult<()> {
        let hauling_json = project
            .hauling
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO project (project_id, name, location, hauling_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![project.project_id, project.name, project.location, hauling_json],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT project_id, name, location, hauling_json FROM project WHERE project_id = ?1",
                params![project_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((project_id, name, location, hauling_json)) = row else {
            return Ok(None);
        };
        let hauling: Option<HaulingConfig> = hauling_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Some(Project {
            project_id,
            name,
            location,
            hauling,
        }))
    }
}
