// ==========================================
// DUPA Estimator - Project
// ==========================================

use serde::{Deserialize, Serialize};

/// One leg of a hauling route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub distance_km: f64,
    pub speed_unloaded_kmh: f64,
    pub speed_loaded_kmh: f64,
}

/// Material delivery configuration of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulingConfig {
    pub total_distance_km: f64,
    pub free_hauling_distance_km: f64,
    pub route_segments: Vec<RouteSegment>,
    pub equipment_hourly_rate: f64,
    pub equipment_capacity_cu_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    pub location: String,
    pub hauling: Option<HaulingConfig>,
}
