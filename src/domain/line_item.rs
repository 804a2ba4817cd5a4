// ==========================================
// DUPA Estimator - Computed BOQ line item
// ==========================================
// Rate snapshot: every entry carries the rate actually used.
// Only quantity / total_amount change after instantiation.
// ==========================================

use crate::domain::types::MarkupBasis;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Resolved entries
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLaborEntry {
    pub designation: String,
    pub no_of_persons: f64,
    pub no_of_hours: f64,
    pub hourly_rate: f64,
    pub amount: f64,
}

/// Resolved equipment line.
///
/// Minor-tools lines have no equipment id or hourly rate; their amount is
/// derived from the labor cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEquipmentEntry {
    pub equipment_id: Option<String>,
    pub description: String,
    pub is_minor_tools: bool,
    pub no_of_units: f64,
    pub no_of_hours: f64,
    pub hourly_rate: Option<f64>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaterialEntry {
    pub material_code: String,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub base_price: f64,
    pub hauling_surcharge: f64,
    pub unit_cost: f64, // base_price + hauling_surcharge
    pub price_effective_date: Option<NaiveDate>,
    pub amount: f64,
}

// ==========================================
// HaulingCostBreakdown
// ==========================================
// Every field rounded to 2 decimals on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingCostBreakdown {
    pub chargeable_distance_km: f64,
    pub time_unloaded_hr: f64,
    pub time_loaded_hr: f64,
    pub delay_allowance_hr: f64,
    pub maneuver_allowance_hr: f64,
    pub cycle_time_hr: f64,
    pub cost_per_trip: f64,
    pub cost_per_cu_m: f64,
}

// ==========================================
// ComputedBoqLineItem
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedBoqLineItem {
    // ===== Identity =====
    pub line_item_id: String,
    pub project_id: String,
    pub template_id: String,
    pub location: String,

    // ===== Pay item =====
    pub pay_item_number: String,
    pub description: String,
    pub unit_of_measurement: String,
    pub output_per_hour: f64,

    // ===== Rate snapshot =====
    pub labor: Vec<ResolvedLaborEntry>,
    pub equipment: Vec<ResolvedEquipmentEntry>,
    pub materials: Vec<ResolvedMaterialEntry>,
    pub hauling: Option<HaulingCostBreakdown>,
    pub rates_as_of: NaiveDate,

    // ===== Direct cost =====
    pub labor_cost: f64,
    pub equipment_cost: f64,
    pub material_cost: f64,
    pub direct_cost: f64,

    // ===== Add-ons (policy A) =====
    pub markup_basis: MarkupBasis,
    pub ocm_percent: f64,
    pub cp_percent: f64,
    pub vat_percent: f64,
    pub ocm_amount: f64,
    pub cp_amount: f64,
    pub vat_amount: f64,

    // ===== Totals =====
    pub unit_cost: f64,
    pub quantity: f64,
    pub total_amount: f64,

    pub instantiated_at: DateTime<Utc>,
}

impl ComputedBoqLineItem {
    /// Change the quantity and keep `total_amount == unit_cost * quantity`.
    ///
    /// # Returns
    /// - Err(message): quantity negative or not a number; item unchanged
    pub fn set_quantity(&mut self, quantity: f64) -> Result<(), String> {
        if !(quantity >= 0.0) || !quantity.is_finite() {
            return Err(format!("quantity must be a finite value >= 0, got {}", quantity));
        }
        self.quantity = quantity;
        self.total_amount = self.unit_cost * quantity;
        Ok(())
    }

    /// Direct cost for the whole quantity (contribution to project EDC)
    pub fn extended_direct_cost(&self) -> f64 {
        self.direct_cost * self.quantity
    }
}
