// ==========================================
// DUPA Estimator - Configuration layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod engine_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use engine_config_trait::EngineConfigReader;
