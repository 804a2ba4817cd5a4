// ==========================================
// DUPA Estimator - Unit price analysis template
// ==========================================
// Read-only input to the engine. Entries carry quantities only, no rates.
// ==========================================

use serde::{Deserialize, Serialize};

/// Description fragment that marks a minor-tools equipment line
pub const MINOR_TOOLS_MARKER: &str = "minor tools";

// ==========================================
// MarkupPercentages - OCM / CP / VAT set
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkupPercentages {
    pub ocm_percent: f64,
    pub cp_percent: f64,
    pub vat_percent: f64,
}

impl MarkupPercentages {
    pub fn new(ocm_percent: f64, cp_percent: f64, vat_percent: f64) -> Self {
        Self {
            ocm_percent,
            cp_percent,
            vat_percent,
        }
    }

    /// First negative percentage as (field, value)
    pub fn first_negative(&self) -> Option<(&'static str, f64)> {
        [
            ("ocm_percent", self.ocm_percent),
            ("cp_percent", self.cp_percent),
            ("vat_percent", self.vat_percent),
        ]
        .into_iter()
        .find(|(_, v)| *v < 0.0 || v.is_nan())
    }
}

// ==========================================
// Template entries
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborTemplateEntry {
    pub designation: String,
    pub no_of_persons: f64,
    pub no_of_hours: f64,
}

/// Equipment line variant, fixed when the template is authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentEntryKind {
    Standard { equipment_id: String },
    MinorToolsSurcharge,
}

impl EquipmentEntryKind {
    /// Tag an equipment line from its description.
    ///
    /// Used when authoring or importing templates; a description containing
    /// "minor tools" (any case) becomes `MinorToolsSurcharge`.
    pub fn classify(description: &str, equipment_id: &str) -> Self {
        if description.to_lowercase().contains(MINOR_TOOLS_MARKER) {
            EquipmentEntryKind::MinorToolsSurcharge
        } else {
            EquipmentEntryKind::Standard {
                equipment_id: equipment_id.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentTemplateEntry {
    pub kind: EquipmentEntryKind,
    pub description: String,
    pub no_of_units: f64,
    pub no_of_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTemplateEntry {
    pub material_code: String,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
}

// ==========================================
// DupaTemplate
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DupaTemplate {
    pub template_id: String,
    pub pay_item_number: String,
    pub description: String,
    pub unit_of_measurement: String,
    pub output_per_hour: f64,

    pub labor: Vec<LaborTemplateEntry>,
    pub equipment: Vec<EquipmentTemplateEntry>,
    pub materials: Vec<MaterialTemplateEntry>,

    pub markup: MarkupPercentages,
    pub evaluated_markup: Option<MarkupPercentages>,

    pub is_active: bool,
}

impl DupaTemplate {
    /// Check the template is well formed.
    ///
    /// # Returns
    /// - Ok(()): usable for instantiation
    /// - Err((field, message)): first offending field
    pub fn validate(&self) -> Result<(), (String, String)> {
        if self.pay_item_number.trim().is_empty() {
            return Err(("pay_item_number".into(), "must not be empty".into()));
        }
        if self.unit_of_measurement.trim().is_empty() {
            return Err(("unit_of_measurement".into(), "must not be empty".into()));
        }
        if !(self.output_per_hour >= 0.0) {
            return Err(("output_per_hour".into(), "must be >= 0".into()));
        }

        for (i, entry) in self.labor.iter().enumerate() {
            if entry.designation.trim().is_empty() {
                return Err((format!("labor[{}].designation", i), "must not be empty".into()));
            }
            if !(entry.no_of_persons >= 0.0) {
                return Err((format!("labor[{}].no_of_persons", i), "must be >= 0".into()));
            }
            if !(entry.no_of_hours >= 0.0) {
                return Err((format!("labor[{}].no_of_hours", i), "must be >= 0".into()));
            }
        }

        for (i, entry) in self.equipment.iter().enumerate() {
            if let EquipmentEntryKind::Standard { equipment_id } = &entry.kind {
                if equipment_id.trim().is_empty() {
                    return Err((
                        format!("equipment[{}].equipment_id", i),
                        "must not be empty".into(),
                    ));
                }
            }
            if !(entry.no_of_units >= 0.0) {
                return Err((format!("equipment[{}].no_of_units", i), "must be >= 0".into()));
            }
            if !(entry.no_of_hours >= 0.0) {
                return Err((format!("equipment[{}].no_of_hours", i), "must be >= 0".into()));
            }
        }

        for (i, entry) in self.materials.iter().enumerate() {
            if entry.material_code.trim().is_empty() {
                return Err((
                    format!("materials[{}].material_code", i),
                    "must not be empty".into(),
                ));
            }
            if !(entry.quantity >= 0.0) {
                return Err((format!("materials[{}].quantity", i), "must be >= 0".into()));
            }
        }

        if let Some((field, value)) = self.markup.first_negative() {
            return Err((field.to_string(), format!("must be >= 0, got {}", value)));
        }
        if let Some(evaluated) = &self.evaluated_markup {
            if let Some((field, value)) = evaluated.first_negative() {
                return Err((
                    format!("evaluated_markup.{}", field),
                    format!("must be >= 0, got {}", value),
                ));
            }
        }

        Ok(())
    }
}
