// ==========================================
// DUPA Estimator - Entry point
// ==========================================
// Opens (or creates) the estimate database and reports its state.
// Transports sit on top of `AppState::boq_api`.
// ==========================================

use anyhow::Context;
use dupa_estimator::app::{get_default_db_path, AppState};

fn main() -> anyhow::Result<()> {
    dupa_estimator::logging::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", dupa_estimator::APP_NAME, dupa_estimator::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "using database");

    let state = AppState::new(db_path.clone())
        .with_context(|| format!("failed to initialize database at {}", db_path))?;

    tracing::info!(schema_version = ?state.schema_version, "database ready");

    let config = state
        .config_manager
        .get_config_snapshot()
        .context("failed to read config")?;
    tracing::info!(config = %config, "active configuration");

    Ok(())
}
