// ==========================================
// DUPA Estimator - Rate resolver
// ==========================================
// Reads current labor / equipment / material rates from master data.
// A missing record is a permanent RateResolution error, never zero.
// Lookups have no side effects; identical arguments give identical values.
// ==========================================

use crate::domain::line_item::HaulingCostBreakdown;
use crate::domain::rates::{MaterialPrice, RateRecord};
use crate::domain::types::RateKind;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{MasterDataRepository, RepositoryError};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Material price with the hauling surcharge merged in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterialPrice {
    pub price: MaterialPrice,
    pub hauling_surcharge: f64,
    pub unit_cost: f64,
}

#[derive(Clone)]
pub struct RateResolver {
    master_data: Arc<dyn MasterDataRepository>,
}

impl RateResolver {
    pub fn new(master_data: Arc<dyn MasterDataRepository>) -> Self {
        Self { master_data }
    }

    /// Hourly rate of a labor designation at a location
    pub async fn resolve_labor_rate(
        &self,
        location: &str,
        designation: &str,
        as_of: NaiveDate,
    ) -> EngineResult<f64> {
        let record = self
            .master_data
            .find_rate(RateKind::Labor, designation, location, as_of)
            .await?;

        let rate = match record {
            Some(RateRecord::Labor(sheet)) => sheet.rate_for(designation),
            Some(other) => return Err(mismatched(RateKind::Labor, &other)),
            None => None,
        }
        .ok_or_else(|| miss(RateKind::Labor, designation, location))?;

        ensure_rate_non_negative("labor.hourly_rate", designation, rate)?;
        debug!(location, designation, rate, "labor rate resolved");
        Ok(rate)
    }

    /// Hourly rate of an equipment item; rental rate / 8 when no hourly rate is recorded
    pub async fn resolve_equipment_rate(
        &self,
        equipment_id: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> EngineResult<f64> {
        let record = self
            .master_data
            .find_rate(RateKind::Equipment, equipment_id, location, as_of)
            .await?;

        let rate = match record {
            Some(RateRecord::Equipment(equipment)) => equipment.effective_hourly_rate(),
            Some(other) => return Err(mismatched(RateKind::Equipment, &other)),
            None => None,
        }
        .ok_or_else(|| miss(RateKind::Equipment, equipment_id, location))?;

        ensure_rate_non_negative("equipment.hourly_rate", equipment_id, rate)?;
        debug!(equipment_id, rate, "equipment rate resolved");
        Ok(rate)
    }

    /// Base price of a material at a location on a date
    pub async fn resolve_material_price(
        &self,
        material_code: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> EngineResult<MaterialPrice> {
        let record = self
            .master_data
            .find_rate(RateKind::Material, material_code, location, as_of)
            .await?;

        let price = match record {
            Some(RateRecord::Material(price)) => price,
            Some(other) => return Err(mismatched(RateKind::Material, &other)),
            None => return Err(miss(RateKind::Material, material_code, location)),
        };

        ensure_rate_non_negative("material.base_price", material_code, price.base_price)?;
        debug!(material_code, base_price = price.base_price, "material price resolved");
        Ok(price)
    }

    /// Material price plus the per-cu.m. hauling surcharge, when one applies
    pub async fn resolve_material_unit_cost(
        &self,
        material_code: &str,
        location: &str,
        as_of: NaiveDate,
        hauling: Option<&HaulingCostBreakdown>,
    ) -> EngineResult<ResolvedMaterialPrice> {
        let price = self
            .resolve_material_price(material_code, location, as_of)
            .await?;
        let hauling_surcharge = hauling.map_or(0.0, |h| h.cost_per_cu_m);
        let unit_cost = price.base_price + hauling_surcharge;

        Ok(ResolvedMaterialPrice {
            price,
            hauling_surcharge,
            unit_cost,
        })
    }
}

fn miss(kind: RateKind, key: &str, location: &str) -> EngineError {
    EngineError::RateResolution {
        kind,
        key: key.to_string(),
        location: location.to_string(),
    }
}

fn mismatched(expected: RateKind, got: &RateRecord) -> EngineError {
    EngineError::Repository(RepositoryError::InternalError(format!(
        "master data returned a {} record for a {} lookup",
        got.kind(),
        expected
    )))
}

fn ensure_rate_non_negative(field: &str, key: &str, rate: f64) -> EngineResult<()> {
    if rate >= 0.0 && rate.is_finite() {
        Ok(())
    } else {
        Err(EngineError::validation(
            field,
            format!("master rate for {} is {}", key, rate),
        ))
    }
}
