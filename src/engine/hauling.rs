// ==========================================
// DUPA Estimator - Hauling cost model
// ==========================================
// Per-unit delivery surcharge from route segments and the hauling
// unit's cycle time. Every output field is rounded to 2 decimals on
// its own, and later fields are computed from the rounded values.
// ==========================================

use crate::domain::line_item::HaulingCostBreakdown;
use crate::domain::project::HaulingConfig;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

/// Delay allowance as a share of travel time
pub const DELAY_ALLOWANCE_FACTOR: f64 = 0.10;

/// Fixed maneuvering time per trip (hours)
pub const MANEUVER_ALLOWANCE_HR: f64 = 0.25;

/// Round half away from zero to 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stateless engine
pub struct HaulingCostModel {}

impl HaulingCostModel {
    pub fn new() -> Self {
        Self {}
    }

    /// Compute the hauling breakdown of a route.
    ///
    /// # Returns
    /// - Err(Validation): negative distance/rate, free distance beyond total
    /// - Err(Computation): zero capacity or zero segment speed
    pub fn compute(&self, config: &HaulingConfig) -> EngineResult<HaulingCostBreakdown> {
        validate_config(config)?;

        let chargeable_distance_km =
            round2(config.total_distance_km - config.free_hauling_distance_km);

        let mut raw_unloaded = 0.0;
        let mut raw_loaded = 0.0;
        for (i, segment) in config.route_segments.iter().enumerate() {
            if segment.speed_unloaded_kmh <= 0.0 || segment.speed_loaded_kmh <= 0.0 {
                return Err(EngineError::Computation(format!(
                    "route_segments[{}] has a non-positive speed",
                    i
                )));
            }
            raw_unloaded += segment.distance_km / segment.speed_unloaded_kmh;
            raw_loaded += segment.distance_km / segment.speed_loaded_kmh;
        }

        let time_unloaded_hr = round2(raw_unloaded);
        let time_loaded_hr = round2(raw_loaded);
        let delay_allowance_hr = round2(DELAY_ALLOWANCE_FACTOR * (time_unloaded_hr + time_loaded_hr));
        let maneuver_allowance_hr = round2(MANEUVER_ALLOWANCE_HR);
        let cycle_time_hr =
            round2(time_unloaded_hr + time_loaded_hr + delay_allowance_hr + maneuver_allowance_hr);
        let cost_per_trip = round2(cycle_time_hr * config.equipment_hourly_rate);
        let cost_per_cu_m = round2(cost_per_trip / config.equipment_capacity_cu_m);

        debug!(
            chargeable_distance_km,
            cycle_time_hr,
            cost_per_trip,
            cost_per_cu_m,
            "hauling cost computed"
        );

        Ok(HaulingCostBreakdown {
            chargeable_distance_km,
            time_unloaded_hr,
            time_loaded_hr,
            delay_allowance_hr,
            maneuver_allowance_hr,
            cycle_time_hr,
            cost_per_trip,
            cost_per_cu_m,
        })
    }
}

impl Default for HaulingCostModel {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_config(config: &HaulingConfig) -> EngineResult<()> {
    let non_negative = [
        ("total_distance_km", config.total_distance_km),
        ("free_hauling_distance_km", config.free_hauling_distance_km),
        ("equipment_hourly_rate", config.equipment_hourly_rate),
    ];
    for (field, value) in non_negative {
        if !(value >= 0.0) {
            return Err(EngineError::validation(
                format!("hauling.{}", field),
                format!("must be >= 0, got {}", value),
            ));
        }
    }
    if config.free_hauling_distance_km > config.total_distance_km {
        return Err(EngineError::validation(
            "hauling.free_hauling_distance_km",
            "exceeds total_distance_km",
        ));
    }
    for (i, segment) in config.route_segments.iter().enumerate() {
        if !(segment.distance_km >= 0.0) {
            return Err(EngineError::validation(
                format!("hauling.route_segments[{}].distance_km", i),
                "must be >= 0",
            ));
        }
    }
    if !(config.equipment_capacity_cu_m > 0.0) {
        return Err(EngineError::Computation(format!(
            "hauling equipment capacity must be > 0, got {}",
            config.equipment_capacity_cu_m
        )));
    }
    Ok(())
}
