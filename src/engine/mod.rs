// ==========================================
// DUPA Estimator - Engine layer
// ==========================================
// Pricing rules only; no SQL here. Collaborators are reached
// through the repository traits.
// ==========================================

pub mod add_on;
pub mod cost_aggregator;
pub mod error;
pub mod hauling;
pub mod instantiation;
pub mod project_summary;
pub mod rate_resolver;
pub mod repositories;

pub use add_on::{
    compute_add_ons, compute_indirect_cost_schedule, select_bracket, AddOnBreakdown,
    IndirectCostBracket, IndirectCostSummary, INDIRECT_COST_BRACKETS,
};
pub use cost_aggregator::{
    compute_equipment_cost, compute_labor_cost, compute_material_cost, CostAggregator,
    DirectCost, MINOR_TOOLS_RATE,
};
pub use error::{EngineError, EngineResult};
pub use hauling::HaulingCostModel;
pub use instantiation::{InstantiateOptions, InstantiationEngine};
pub use project_summary::{summarize_line_items, ProjectCostSummarizer, ProjectCostSummary};
pub use rate_resolver::{RateResolver, ResolvedMaterialPrice};
pub use repositories::EngineRepositories;
