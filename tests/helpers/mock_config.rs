// ==========================================
// Mock configuration - for integration tests
// ==========================================

use async_trait::async_trait;
use dupa_estimator::config::EngineConfigReader;
use dupa_estimator::repository::RepositoryResult;

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub rate_lookup_timeout_ms: Option<u64>,
    pub require_active_template: bool,
    pub allow_evaluated_markup: bool,
}

impl MockConfig {
    /// Same values as an empty config_kv table
    pub fn default() -> Self {
        Self {
            rate_lookup_timeout_ms: None,
            require_active_template: true,
            allow_evaluated_markup: true,
        }
    }

    pub fn with_timeout_ms(ms: u64) -> Self {
        let mut config = Self::default();
        config.rate_lookup_timeout_ms = Some(ms);
        config
    }

    pub fn evaluated_disabled() -> Self {
        let mut config = Self::default();
        config.allow_evaluated_markup = false;
        config
    }
}

#[async_trait]
impl EngineConfigReader for MockConfig {
    async fn get_rate_lookup_timeout_ms(&self) -> RepositoryResult<Option<u64>> {
        Ok(self.rate_lookup_timeout_ms)
    }

    async fn get_require_active_template(&self) -> RepositoryResult<bool> {
        Ok(self.require_active_template)
    }

    async fn get_allow_evaluated_markup(&self) -> RepositoryResult<bool> {
        Ok(self.allow_evaluated_markup)
    }
}
