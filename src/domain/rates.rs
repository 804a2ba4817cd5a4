// ==========================================
// DUPA Estimator - Master rate records
// ==========================================
// Owned by master-data collaborators; the engine only reads them.
// ==========================================

use crate::domain::types::RateKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// LaborRate - hourly rates per designation for one location
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRate {
    pub location: String,
    pub district: String,
    pub hourly_rates: BTreeMap<String, f64>, // designation -> PHP/hour
}

impl LaborRate {
    /// Hourly rate for a designation, matched case-insensitively after trimming
    pub fn rate_for(&self, designation: &str) -> Option<f64> {
        let wanted = designation.trim();
        self.hourly_rates
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, rate)| *rate)
    }
}

// ==========================================
// EquipmentRate
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRate {
    pub equipment_id: String,
    pub description: String,
    pub hourly_rate: Option<f64>,
    pub rental_rate: Option<f64>, // daily (8 h) rental
}

/// Working hours covered by one rental-rate unit
pub const RENTAL_HOURS_PER_DAY: f64 = 8.0;

impl EquipmentRate {
    /// Recorded hourly rate, else rental rate / 8
    pub fn effective_hourly_rate(&self) -> Option<f64> {
        self.hourly_rate
            .or_else(|| self.rental_rate.map(|r| r / RENTAL_HOURS_PER_DAY))
    }
}

// ==========================================
// MaterialPrice
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub material_code: String,
    pub description: String,
    pub unit: String,
    pub base_price: f64,
    pub location: Option<String>,
    pub effective_date: Option<NaiveDate>,
}

/// Pick the price applicable at `location` on `as_of`.
///
/// Candidates dated after `as_of` or priced for another location are skipped.
/// A location-specific price beats a general one; among equals the latest
/// effective date wins (undated counts as oldest).
pub fn select_material_price<'a>(
    candidates: &'a [MaterialPrice],
    material_code: &str,
    location: &str,
    as_of: NaiveDate,
) -> Option<&'a MaterialPrice> {
    let location = location.trim();
    candidates
        .iter()
        .filter(|p| p.material_code == material_code)
        .filter(|p| match &p.location {
            Some(loc) => loc.trim().eq_ignore_ascii_case(location),
            None => true,
        })
        .filter(|p| p.effective_date.map_or(true, |d| d <= as_of))
        .max_by_key(|p| (p.location.is_some(), p.effective_date))
}

// ==========================================
// RateRecord - what master data returns for a lookup
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateRecord {
    Labor(LaborRate),
    Equipment(EquipmentRate),
    Material(MaterialPrice),
}

impl RateRecord {
    pub fn kind(&self) -> RateKind {
        match self {
            RateRecord::Labor(_) => RateKind::Labor,
            RateRecord::Equipment(_) => RateKind::Equipment,
            RateRecord::Material(_) => RateKind::Material,
        }
    }
}
