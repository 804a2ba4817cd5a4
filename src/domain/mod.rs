// ==========================================
// DUPA Estimator - Domain layer
// ==========================================
// Entities and value types only.
// No data access, no engine logic.
// ==========================================

pub mod line_item;
pub mod project;
pub mod rates;
pub mod template;
pub mod types;

pub use line_item::{
    ComputedBoqLineItem, HaulingCostBreakdown, ResolvedEquipmentEntry, ResolvedLaborEntry,
    ResolvedMaterialEntry,
};
pub use project::{HaulingConfig, Project, RouteSegment};
pub use rates::{select_material_price, EquipmentRate, LaborRate, MaterialPrice, RateRecord};
pub use template::{
    DupaTemplate, EquipmentEntryKind, EquipmentTemplateEntry, LaborTemplateEntry,
    MarkupPercentages, MaterialTemplateEntry,
};
pub use types::{InstantiationState, MarkupBasis, RateKind};
