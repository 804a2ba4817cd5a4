// ==========================================
// DUPA Estimator - BOQ API
// ==========================================
// Thin facade for an outer transport layer: validates requests,
// calls the engine, maps errors. No pricing logic here.
// ==========================================

use crate::api::dto::{InstantiateRequest, UpdateQuantityRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::config::EngineConfigReader;
use crate::domain::line_item::ComputedBoqLineItem;
use crate::engine::{InstantiationEngine, ProjectCostSummarizer, ProjectCostSummary};
use crate::repository::LineItemRepository;
use std::sync::Arc;
use tracing::info;

pub struct BoqApi<C>
where
    C: EngineConfigReader,
{
    engine: Arc<InstantiationEngine<C>>,
    summarizer: Arc<ProjectCostSummarizer>,
    line_item_repo: Arc<dyn LineItemRepository>,
}

impl<C> BoqApi<C>
where
    C: EngineConfigReader,
{
    pub fn new(
        engine: Arc<InstantiationEngine<C>>,
        summarizer: Arc<ProjectCostSummarizer>,
        line_item_repo: Arc<dyn LineItemRepository>,
    ) -> Self {
        Self {
            engine,
            summarizer,
            line_item_repo,
        }
    }

    /// Price a template into a new line item
    pub async fn instantiate(&self, request: InstantiateRequest) -> ApiResult<ComputedBoqLineItem> {
        request.validate()?;
        let item = self
            .engine
            .instantiate(
                &request.template_id,
                &request.location,
                request.quantity,
                &request.project_id,
                request.options(),
            )
            .await?;
        Ok(item)
    }

    pub async fn get_line_item(&self, line_item_id: &str) -> ApiResult<ComputedBoqLineItem> {
        self.line_item_repo
            .find_by_id(line_item_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("ComputedBoqLineItem (id={})", line_item_id)))
    }

    pub async fn list_line_items(&self, project_id: &str) -> ApiResult<Vec<ComputedBoqLineItem>> {
        Ok(self.line_item_repo.list_by_project(project_id).await?)
    }

    /// Change quantity; the rate snapshot is left untouched
    pub async fn update_quantity(
        &self,
        request: UpdateQuantityRequest,
    ) -> ApiResult<ComputedBoqLineItem> {
        request.validate()?;
        let item = self
            .line_item_repo
            .update_quantity(&request.line_item_id, request.quantity)
            .await?;
        info!(
            line_item_id = %item.line_item_id,
            quantity = item.quantity,
            total_amount = item.total_amount,
            "line item quantity updated"
        );
        Ok(item)
    }

    pub async fn delete_line_item(&self, line_item_id: &str) -> ApiResult<()> {
        if !self.line_item_repo.delete(line_item_id).await? {
            return Err(ApiError::NotFound(format!(
                "ComputedBoqLineItem (id={})",
                line_item_id
            )));
        }
        info!(line_item_id, "line item deleted");
        Ok(())
    }

    /// Project totals with the EDC bracket indirect cost schedule
    pub async fn project_cost_summary(&self, project_id: &str) -> ApiResult<ProjectCostSummary> {
        Ok(self.summarizer.summarize(project_id).await?)
    }
}
