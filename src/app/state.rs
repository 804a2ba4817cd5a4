// ==========================================
// DUPA Estimator - Application state
// ==========================================
// Shared connection, repositories, engine and API instances.
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::BoqApi;
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::engine::{EngineRepositories, InstantiationEngine, ProjectCostSummarizer};
use crate::repository::{
    RepositoryResult, SqliteLineItemRepository, SqliteMasterDataRepository,
    SqliteProjectRepository, SqliteTemplateRepository,
};

/// Application state
pub struct AppState {
    pub db_path: String,
    /// schema_version row as read right after init
    pub schema_version: Option<i64>,

    pub config_manager: Arc<ConfigManager>,

    pub template_repo: Arc<SqliteTemplateRepository>,
    pub master_data_repo: Arc<SqliteMasterDataRepository>,
    pub project_repo: Arc<SqliteProjectRepository>,
    pub line_item_repo: Arc<SqliteLineItemRepository>,

    pub boq_api: Arc<BoqApi<ConfigManager>>,
}

impl AppState {
    /// Open the database, create the schema and wire everything
    ///
    /// # Arguments
    /// - db_path: SQLite file path (":memory:" works for tests)
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, "initializing application state");

        let conn = open_sqlite_connection(&db_path)?;
        init_schema(&conn)?;
        let schema_version = read_schema_version(&conn)?;
        tracing::debug!(?schema_version, "schema ready");
        let conn = Arc::new(Mutex::new(conn));

        // ===== Repositories =====
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let template_repo = Arc::new(SqliteTemplateRepository::from_connection(conn.clone()));
        let master_data_repo = Arc::new(SqliteMasterDataRepository::from_connection(conn.clone()));
        let project_repo = Arc::new(SqliteProjectRepository::from_connection(conn.clone()));
        let line_item_repo = Arc::new(SqliteLineItemRepository::from_connection(conn));

        // ===== Engine =====
        let repos = EngineRepositories::new(
            template_repo.clone(),
            master_data_repo.clone(),
            project_repo.clone(),
            line_item_repo.clone(),
        );
        let engine = Arc::new(InstantiationEngine::new(config_manager.clone(), repos));
        let summarizer = Arc::new(ProjectCostSummarizer::new(
            project_repo.clone(),
            line_item_repo.clone(),
        ));

        // ===== API =====
        let boq_api = Arc::new(BoqApi::new(engine, summarizer, line_item_repo.clone()));

        Ok(Self {
            db_path,
            schema_version,
            config_manager,
            template_repo,
            master_data_repo,
            project_repo,
            line_item_repo,
            boq_api,
        })
    }
}

/// Default database location
///
/// DUPA_ESTIMATOR_DB_PATH wins; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("DUPA_ESTIMATOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./dupa_estimator.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("dupa-estimator");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("dupa_estimator.db");
        }
    }

    path.to_string_lossy().to_string()
}
