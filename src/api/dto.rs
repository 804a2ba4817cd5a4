// ==========================================
// DUPA Estimator - API request types
// ==========================================
// Strongly typed request bodies, validated once here so the engine
// never coerces loosely typed input.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::engine::InstantiateOptions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Instantiate a template into a project's BOQ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstantiateRequest {
    pub template_id: String,
    pub project_id: String,
    pub location: String,
    pub quantity: f64,
    #[serde(default)]
    pub use_evaluated: bool,
    #[serde(default)]
    pub active_only: Option<bool>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl InstantiateRequest {
    pub fn validate(&self) -> ApiResult<()> {
        require_non_empty("template_id", &self.template_id)?;
        require_non_empty("project_id", &self.project_id)?;
        require_non_empty("location", &self.location)?;
        require_non_negative("quantity", self.quantity)
    }

    pub fn options(&self) -> InstantiateOptions {
        InstantiateOptions {
            use_evaluated: self.use_evaluated,
            active_only: self.active_only,
            as_of: self.as_of,
        }
    }
}

/// Change the quantity of an existing line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateQuantityRequest {
    pub line_item_id: String,
    pub quantity: f64,
}

impl UpdateQuantityRequest {
    pub fn validate(&self) -> ApiResult<()> {
        require_non_empty("line_item_id", &self.line_item_id)?;
        require_non_negative("quantity", self.quantity)
    }
}

fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> ApiResult<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("must be a finite value >= 0, got {}", value),
        });
    }
    Ok(())
}
