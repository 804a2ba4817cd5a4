// ==========================================
// DUPA Estimator - Engine collaborator bundle
// ==========================================
// Groups the repositories the instantiation engine talks to, so the
// engine takes one argument and tests can swap the whole set.
// ==========================================

use std::sync::Arc;

use crate::repository::{
    LineItemRepository, MasterDataRepository, ProjectRepository, TemplateRepository,
};

/// Collaborators of the instantiation engine
///
/// - `template_repo`: template source (read-only)
/// - `master_data_repo`: labor / equipment / material rates
/// - `project_repo`: project location and hauling configuration
/// - `line_item_repo`: persistence of computed line items
#[derive(Clone)]
pub struct EngineRepositories {
    pub template_repo: Arc<dyn TemplateRepository>,
    pub master_data_repo: Arc<dyn MasterDataRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub line_item_repo: Arc<dyn LineItemRepository>,
}

impl EngineRepositories {
    pub fn new(
        template_repo: Arc<dyn TemplateRepository>,
        master_data_repo: Arc<dyn MasterDataRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        line_item_repo: Arc<dyn LineItemRepository>,
    ) -> Self {
        Self {
            template_repo,
            master_data_repo,
            project_repo,
            line_item_repo,
        }
    }
}
