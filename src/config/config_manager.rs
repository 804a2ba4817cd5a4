// ==========================================
// DUPA Estimator - Configuration manager
// ==========================================
// Storage: config_kv table (scope_id + key -> value)
// Missing keys fall back to documented defaults.
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub mod config_keys {
    pub const RATE_LOOKUP_TIMEOUT_MS: &str = "rate_lookup_timeout_ms";
    pub const REQUIRE_ACTIVE_TEMPLATE: &str = "require_active_template";
    pub const ALLOW_EVALUATED_MARKUP: &str = "allow_evaluated_markup";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Raw value of a global key
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a global key
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// All global keys as a JSON object
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;

        Ok(serde_json::to_string(&json!(rows))?)
    }

    fn parse_bool(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(RepositoryError::FieldValueError {
                    field: key.to_string(),
                    message: format!("not a boolean: {}", other),
                }),
            },
        }
    }
}

#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_rate_lookup_timeout_ms(&self) -> RepositoryResult<Option<u64>> {
        let Some(raw) = self.get_config_value(config_keys::RATE_LOOKUP_TIMEOUT_MS)? else {
            return Ok(None);
        };
        let ms: u64 = raw
            .trim()
            .parse()
            .map_err(|e| RepositoryError::FieldValueError {
                field: config_keys::RATE_LOOKUP_TIMEOUT_MS.to_string(),
                message: format!("{}: {}", raw, e),
            })?;
        Ok(if ms == 0 { None } else { Some(ms) })
    }

    async fn get_require_active_template(&self) -> RepositoryResult<bool> {
        self.parse_bool(config_keys::REQUIRE_ACTIVE_TEMPLATE, true)
    }

    async fn get_allow_evaluated_markup(&self) -> RepositoryResult<bool> {
        self.parse_bool(config_keys::ALLOW_EVALUATED_MARKUP, true)
    }
}
