// ==========================================
// DUPA Estimator - Engine configuration reader trait
// ==========================================
// Read-only configuration interface used by the engine.
// Implementer: ConfigManager (config_kv table)
// ==========================================

use crate::repository::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// Caller-level budget for the concurrent rate lookups
    ///
    /// # Returns
    /// - Some(ms): lookups must finish within this many milliseconds
    /// - None: no budget
    ///
    /// # Default
    /// - 0 (stored) = None
    async fn get_rate_lookup_timeout_ms(&self) -> RepositoryResult<Option<u64>>;

    /// Whether instantiation requires an active template when the caller
    /// does not say
    ///
    /// # Default
    /// - true
    async fn get_require_active_template(&self) -> RepositoryResult<bool>;

    /// Whether `use_evaluated` requests are honoured
    ///
    /// # Default
    /// - true
    async fn get_allow_evaluated_markup(&self) -> RepositoryResult<bool>;
}
