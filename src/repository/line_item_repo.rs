// ==========================================
// DUPA Estimator - Computed BOQ line item repository
// ==========================================
// Each line item is one self-contained JSON document written in a
// single statement. Only quantity/total_amount are ever rewritten.
// ==========================================

use crate::domain::line_item::ComputedBoqLineItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// LineItemRepository Trait
// ==========================================
#[async_trait]
pub trait LineItemRepository: Send + Sync {
    /// Persist a new line item
    ///
    /// # Returns
    /// - Ok(id): id of the stored item
    async fn save(&self, item: &ComputedBoqLineItem) -> RepositoryResult<String>;

    async fn find_by_id(&self, line_item_id: &str) -> RepositoryResult<Option<ComputedBoqLineItem>>;

    async fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<ComputedBoqLineItem>>;

    /// Change the quantity of a stored item; total_amount follows
    ///
    /// # Returns
    /// - Ok(item): the updated item
    /// - Err(NotFound): no such item
    /// - Err(FieldValueError): negative quantity
    async fn update_quantity(
        &self,
        line_item_id: &str,
        quantity: f64,
    ) -> RepositoryResult<ComputedBoqLineItem>;

    /// Delete an item; Ok(false) when it did not exist
    async fn delete(&self, line_item_id: &str) -> RepositoryResult<bool>;
}

// ==========================================
// SqliteLineItemRepository
// ==========================================
pub struct SqliteLineItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLineItemRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl LineItemRepository for SqliteLineItemRepository {
    async fn save(&self, item: &ComputedBoqLineItem) -> RepositoryResult<String> {
        let document = serde_json::to_string(item)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO boq_line_item (line_item_id, project_id, template_id, instantiated_at, document)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                item.line_item_id,
                item.project_id,
                item.template_id,
                item.instantiated_at.to_rfc3339(),
                document
            ],
        )?;
        Ok(item.line_item_id.clone())
    }

    async fn find_by_id(&self, line_item_id: &str) -> RepositoryResult<Option<ComputedBoqLineItem>> {
        let conn = self.get_conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM boq_line_item WHERE line_item_id = ?1",
                params![line_item_id],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<ComputedBoqLineItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT document FROM boq_line_item
            WHERE project_id = ?1
            ORDER BY instantiated_at, line_item_id
            "#,
        )?;
        let documents = stmt
            .query_map(params![project_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(RepositoryError::from))
            .collect()
    }

    async fn update_quantity(
        &self,
        line_item_id: &str,
        quantity: f64,
    ) -> RepositoryResult<ComputedBoqLineItem> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let document: Option<String> = tx
            .query_row(
                "SELECT document FROM boq_line_item WHERE line_item_id = ?1",
                params![line_item_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(document) = document else {
            return Err(RepositoryError::NotFound {
                entity: "ComputedBoqLineItem".to_string(),
                id: line_item_id.to_string(),
            });
        };

        let mut item: ComputedBoqLineItem = serde_json::from_str(&document)?;
        item.set_quantity(quantity)
            .map_err(|message| RepositoryError::FieldValueError {
                field: "quantity".to_string(),
                message,
            })?;

        tx.execute(
            "UPDATE boq_line_item SET document = ?2 WHERE line_item_id = ?1",
            params![line_item_id, serde_json::to_string(&item)?],
        )?;
        tx.commit()?;

        Ok(item)
    }

    async fn delete(&self, line_item_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM boq_line_item WHERE line_item_id = ?1",
            params![line_item_id],
        )?;
        Ok(affected > 0)
    }
}
