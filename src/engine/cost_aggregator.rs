// ==========================================
// DUPA Estimator - Direct cost aggregation
// ==========================================
// labor     = sum(persons * hours * rate)
// equipment = sum(units * hours * rate), minor-tools lines = labor * 10%
// material  = sum(quantity * unit_cost)
// direct    = labor + equipment + material
// ==========================================

use crate::domain::line_item::{ResolvedEquipmentEntry, ResolvedLaborEntry, ResolvedMaterialEntry};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Share of labor cost charged per minor-tools line
pub const MINOR_TOOLS_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCost {
    pub labor: Vec<ResolvedLaborEntry>,
    pub equipment: Vec<ResolvedEquipmentEntry>,
    pub materials: Vec<ResolvedMaterialEntry>,
    pub labor_cost: f64,
    pub equipment_cost: f64,
    pub minor_tools_cost: f64,
    pub material_cost: f64,
    pub direct_cost: f64,
}

pub fn labor_amount(no_of_persons: f64, no_of_hours: f64, hourly_rate: f64) -> f64 {
    no_of_persons * no_of_hours * hourly_rate
}

pub fn minor_tools_cost(labor_cost: f64) -> f64 {
    labor_cost * MINOR_TOOLS_RATE
}

/// Sum of persons * hours * rate
pub fn compute_labor_cost(entries: &[ResolvedLaborEntry]) -> f64 {
    entries
        .iter()
        .map(|e| labor_amount(e.no_of_persons, e.no_of_hours, e.hourly_rate))
        .sum()
}

/// Equipment cost given the labor cost.
///
/// Each minor-tools line contributes `labor_cost * 10%` on its own,
/// whatever its units/hours/rate say; two such lines charge twice.
pub fn compute_equipment_cost(
    entries: &[ResolvedEquipmentEntry],
    labor_cost: f64,
) -> EngineResult<f64> {
    entries
        .iter()
        .map(|e| equipment_amount(e, labor_cost))
        .sum()
}

pub fn compute_material_cost(entries: &[ResolvedMaterialEntry]) -> f64 {
    entries.iter().map(|e| e.quantity * e.unit_cost).sum()
}

fn equipment_amount(entry: &ResolvedEquipmentEntry, labor_cost: f64) -> EngineResult<f64> {
    if entry.is_minor_tools {
        return Ok(minor_tools_cost(labor_cost));
    }
    let hourly_rate = entry.hourly_rate.ok_or_else(|| {
        EngineError::Computation(format!(
            "equipment line '{}' has no resolved hourly rate",
            entry.description
        ))
    })?;
    Ok(entry.no_of_units * entry.no_of_hours * hourly_rate)
}

// ==========================================
// CostAggregator
// ==========================================
pub struct CostAggregator {}

impl CostAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// Fill each entry's amount and total the direct cost
    #[instrument(skip_all, fields(
        labor_count = labor.len(),
        equipment_count = equipment.len(),
        material_count = materials.len()
    ))]
    pub fn aggregate(
        &self,
        mut labor: Vec<ResolvedLaborEntry>,
        mut equipment: Vec<ResolvedEquipmentEntry>,
        mut materials: Vec<ResolvedMaterialEntry>,
    ) -> EngineResult<DirectCost> {
        for entry in labor.iter_mut() {
            entry.amount = labor_amount(entry.no_of_persons, entry.no_of_hours, entry.hourly_rate);
        }
        let labor_cost = compute_labor_cost(&labor);

        let mut minor_tools_total = 0.0;
        for entry in equipment.iter_mut() {
            entry.amount = equipment_amount(entry, labor_cost)?;
            if entry.is_minor_tools {
                minor_tools_total += entry.amount;
            }
        }
        let equipment_cost = compute_equipment_cost(&equipment, labor_cost)?;

        for entry in materials.iter_mut() {
            entry.amount = entry.quantity * entry.unit_cost;
        }
        let material_cost = compute_material_cost(&materials);

        let direct_cost = labor_cost + equipment_cost + material_cost;
        debug!(labor_cost, equipment_cost, material_cost, direct_cost, "direct cost aggregated");

        Ok(DirectCost {
            labor,
            equipment,
            materials,
            labor_cost,
            equipment_cost,
            minor_tools_cost: minor_tools_total,
            material_cost,
            direct_cost,
        })
    }
}

impl Default for CostAggregator {
    fn default() -> Self {
        Self::new()
    }
}
