// ==========================================
// DUPA Estimator - Template repository
// ==========================================
// Templates are stored as one JSON document per row.
// ==========================================

use crate::domain::template::DupaTemplate;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// TemplateRepository Trait
// ==========================================
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Load a template by id (None when missing)
    async fn find_by_id(&self, template_id: &str) -> RepositoryResult<Option<DupaTemplate>>;
}

// ==========================================
// SqliteTemplateRepository
// ==========================================
pub struct SqliteTemplateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTemplateRepository {
    /// Build on an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert or replace a template
    pub fn upsert(&self, template: &DupaTemplate) -> RepositoryResult<()> {
        let document = serde_json::to_string(template)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO dupa_template (template_id, pay_item_number, is_active, document)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(template_id) DO UPDATE SET
                pay_item_number = excluded.pay_item_number,
                is_active = excluded.is_active,
                document = excluded.document,
                updated_at = datetime('now')
            "#,
            params![
                template.template_id,
                template.pay_item_number,
                template.is_active,
                document
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn find_by_id(&self, template_id: &str) -> RepositoryResult<Option<DupaTemplate>> {
        let conn = self.get_conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM dupa_template WHERE template_id = ?1",
                params![template_id],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }
}
