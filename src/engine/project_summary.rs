// ==========================================
// DUPA Estimator - Project cost summary
// ==========================================
// Bill-of-quantities totals of a project plus the EDC bracket
// indirect cost schedule (policy B) applied to its direct cost.
// ==========================================

use crate::domain::line_item::ComputedBoqLineItem;
use crate::engine::add_on::{compute_indirect_cost_schedule, IndirectCostSummary};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{LineItemRepository, ProjectRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCostSummary {
    pub project_id: String,
    pub item_count: usize,
    /// Sum of direct_cost * quantity over all items (EDC)
    pub estimated_direct_cost: f64,
    /// Sum of the items' total_amount (line-item markups included)
    pub boq_total_amount: f64,
    pub indirect_cost: IndirectCostSummary,
}

/// Summarize already-loaded line items
pub fn summarize_line_items(
    project_id: &str,
    items: &[ComputedBoqLineItem],
) -> EngineResult<ProjectCostSummary> {
    if let Some(foreign) = items.iter().find(|i| i.project_id != project_id) {
        return Err(EngineError::validation(
            "project_id",
            format!(
                "line item {} belongs to project {}",
                foreign.line_item_id, foreign.project_id
            ),
        ));
    }

    let estimated_direct_cost: f64 = items.iter().map(|i| i.extended_direct_cost()).sum();
    let boq_total_amount: f64 = items.iter().map(|i| i.total_amount).sum();
    let indirect_cost = compute_indirect_cost_schedule(estimated_direct_cost)?;

    Ok(ProjectCostSummary {
        project_id: project_id.to_string(),
        item_count: items.len(),
        estimated_direct_cost,
        boq_total_amount,
        indirect_cost,
    })
}

// ==========================================
// ProjectCostSummarizer
// ==========================================
pub struct ProjectCostSummarizer {
    project_repo: Arc<dyn ProjectRepository>,
    line_item_repo: Arc<dyn LineItemRepository>,
}

impl ProjectCostSummarizer {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        line_item_repo: Arc<dyn LineItemRepository>,
    ) -> Self {
        Self {
            project_repo,
            line_item_repo,
        }
    }

    pub async fn summarize(&self, project_id: &str) -> EngineResult<ProjectCostSummary> {
        if self.project_repo.find_by_id(project_id).await?.is_none() {
            return Err(EngineError::not_found("Project", project_id));
        }
        let items = self.line_item_repo.list_by_project(project_id).await?;
        let summary = summarize_line_items(project_id, &items)?;

        info!(
            project_id,
            item_count = summary.item_count,
            edc = summary.estimated_direct_cost,
            ocm_percent = summary.indirect_cost.ocm_percent,
            cp_percent = summary.indirect_cost.cp_percent,
            "project cost summarized"
        );
        Ok(summary)
    }
}
