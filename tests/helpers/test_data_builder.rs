// ==========================================
// Test data builders - for integration tests
// ==========================================
// Reference scenario (location "Malaybalay City", as of 2026-03-01):
//   labor     Foreman 1 x 8 h @ 100 + Skilled Labor 2 x 8 h @ 80   = 2,080
//   equipment Minor Tools (10% of labor) 208 + Backhoe 1 x 2 h @ 1,500
//                                                                    = 3,208
//   materials Cement 10 x (250 + 438) + Sand 2 x (1,200 + 438)      = 10,156
//   direct                                                           = 15,444
//   markup 15 / 10 / 12 -> unit cost 21,621.60
// ==========================================

use chrono::NaiveDate;
use dupa_estimator::domain::{
    DupaTemplate, EquipmentEntryKind, EquipmentRate, EquipmentTemplateEntry, HaulingConfig,
    LaborRate, LaborTemplateEntry, MarkupPercentages, MaterialPrice, MaterialTemplateEntry,
    Project, RouteSegment,
};
use std::collections::BTreeMap;

pub const LOCATION: &str = "Malaybalay City";
pub const PROJECT_ID: &str = "P-2026-001";
pub const TEMPLATE_ID: &str = "T-101";

pub const EXPECTED_LABOR_COST: f64 = 2_080.0;
pub const EXPECTED_EQUIPMENT_COST: f64 = 3_208.0;
pub const EXPECTED_MATERIAL_COST: f64 = 10_156.0;
pub const EXPECTED_DIRECT_COST: f64 = 15_444.0;
pub const EXPECTED_UNIT_COST: f64 = 21_621.6;
pub const EXPECTED_HAULING_PER_CU_M: f64 = 438.0;

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ==========================================
// DupaTemplate builder
// ==========================================
pub struct TemplateBuilder {
    template: DupaTemplate,
}

impl TemplateBuilder {
    pub fn new(template_id: &str) -> Self {
        Self {
            template: DupaTemplate {
                template_id: template_id.to_string(),
                pay_item_number: "101(1)".to_string(),
                description: "Concrete works".to_string(),
                unit_of_measurement: "cu.m".to_string(),
                output_per_hour: 1.0,
                labor: vec![],
                equipment: vec![],
                materials: vec![],
                markup: MarkupPercentages::new(15.0, 10.0, 12.0),
                evaluated_markup: None,
                is_active: true,
            },
        }
    }

    pub fn labor(mut self, designation: &str, persons: f64, hours: f64) -> Self {
        self.template.labor.push(LaborTemplateEntry {
            designation: designation.to_string(),
            no_of_persons: persons,
            no_of_hours: hours,
        });
        self
    }

    pub fn equipment(mut self, equipment_id: &str, description: &str, units: f64, hours: f64) -> Self {
        self.template.equipment.push(EquipmentTemplateEntry {
            kind: EquipmentEntryKind::classify(description, equipment_id),
            description: description.to_string(),
            no_of_units: units,
            no_of_hours: hours,
        });
        self
    }

    pub fn material(mut self, code: &str, description: &str, unit: &str, quantity: f64) -> Self {
        self.template.materials.push(MaterialTemplateEntry {
            material_code: code.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            quantity,
        });
        self
    }

    pub fn evaluated(mut self, ocm: f64, cp: f64, vat: f64) -> Self {
        self.template.evaluated_markup = Some(MarkupPercentages::new(ocm, cp, vat));
        self
    }

    pub fn inactive(mut self) -> Self {
        self.template.is_active = false;
        self
    }

    pub fn build(self) -> DupaTemplate {
        self.template
    }
}

/// Template of the reference scenario
pub fn reference_template() -> DupaTemplate {
    TemplateBuilder::new(TEMPLATE_ID)
        .labor("Foreman", 1.0, 8.0)
        .labor("Skilled Labor", 2.0, 8.0)
        .equipment("", "Minor Tools (10% of Labor Cost)", 1.0, 1.0)
        .equipment("EQ-001", "Backhoe 0.8 cu.m", 1.0, 2.0)
        .material("MAT-CEM", "Portland cement", "bag", 10.0)
        .material("MAT-SND", "Washed sand", "cu.m", 2.0)
        .evaluated(10.0, 8.0, 12.0)
        .build()
}

// ==========================================
// Master data
// ==========================================
pub fn labor_sheet(location: &str, foreman: f64, skilled: f64) -> LaborRate {
    let mut hourly_rates = BTreeMap::new();
    hourly_rates.insert("Foreman".to_string(), foreman);
    hourly_rates.insert("Skilled Labor".to_string(), skilled);
    LaborRate {
        location: location.to_string(),
        district: "Bukidnon 1st DEO".to_string(),
        hourly_rates,
    }
}

pub fn backhoe() -> EquipmentRate {
    EquipmentRate {
        equipment_id: "EQ-001".to_string(),
        description: "Backhoe 0.8 cu.m".to_string(),
        hourly_rate: Some(1_500.0),
        rental_rate: None,
    }
}

pub fn material_price(
    code: &str,
    base_price: f64,
    location: Option<&str>,
    effective_date: Option<NaiveDate>,
) -> MaterialPrice {
    MaterialPrice {
        material_code: code.to_string(),
        description: code.to_string(),
        unit: "unit".to_string(),
        base_price,
        location: location.map(str::to_string),
        effective_date,
    }
}

pub fn reference_material_prices() -> Vec<MaterialPrice> {
    vec![
        material_price(
            "MAT-CEM",
            250.0,
            Some(LOCATION),
            NaiveDate::from_ymd_opt(2026, 1, 1),
        ),
        material_price("MAT-SND", 1_200.0, None, None),
    ]
}

// ==========================================
// Project
// ==========================================

/// 50 km haul, 5 km free, one 45 km segment at 20 / 30 km/h,
/// 500 per hour, 5 cu.m per trip -> 438 per cu.m
pub fn reference_hauling() -> HaulingConfig {
    HaulingConfig {
        total_distance_km: 50.0,
        free_hauling_distance_km: 5.0,
        route_segments: vec![RouteSegment {
            distance_km: 45.0,
            speed_unloaded_kmh: 20.0,
            speed_loaded_kmh: 30.0,
        }],
        equipment_hourly_rate: 500.0,
        equipment_capacity_cu_m: 5.0,
    }
}

pub fn reference_project() -> Project {
    Project {
        project_id: PROJECT_ID.to_string(),
        name: "Road widening, Sayre Highway".to_string(),
        location: LOCATION.to_string(),
        hauling: Some(reference_hauling()),
    }
}
