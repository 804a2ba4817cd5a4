// ==========================================
// DUPA Estimator - Repository layer
// ==========================================
// Collaborator traits consumed by the engine, plus SQLite
// implementations. No pricing logic lives here.
// ==========================================

pub mod error;
pub mod line_item_repo;
pub mod master_data_repo;
pub mod project_repo;
pub mod template_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use line_item_repo::{LineItemRepository, SqliteLineItemRepository};
pub use master_data_repo::{MasterDataRepository, SqliteMasterDataRepository};
pub use project_repo::{ProjectRepository, SqliteProjectRepository};
pub use template_repo::{SqliteTemplateRepository, TemplateRepository};
