// ==========================================
// DUPA Estimator - Indirect cost add-ons
// ==========================================
// Two separate markup policies. They are not interchangeable and
// must not be merged into one formula:
// - compute_add_ons: line-item flat percentages (OCM, CP, VAT)
// - compute_indirect_cost_schedule: project EDC bracket table (OCM, CP)
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// Policy A - line-item flat percentages
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnBreakdown {
    pub direct_cost: f64,
    pub ocm_percent: f64,
    pub cp_percent: f64,
    pub vat_percent: f64,
    pub ocm: f64,
    pub cp: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
}

/// Line-item markup.
///
/// OCM and CP are both taken off the raw direct cost (CP does not cascade
/// on OCM); VAT is taken off direct + OCM + CP.
pub fn compute_add_ons(
    direct_cost: f64,
    ocm_percent: f64,
    cp_percent: f64,
    vat_percent: f64,
) -> EngineResult<AddOnBreakdown> {
    ensure_non_negative("direct_cost", direct_cost)?;
    ensure_non_negative("ocm_percent", ocm_percent)?;
    ensure_non_negative("cp_percent", cp_percent)?;
    ensure_non_negative("vat_percent", vat_percent)?;

    let ocm = direct_cost * ocm_percent / 100.0;
    let cp = direct_cost * cp_percent / 100.0;
    let subtotal = direct_cost + ocm + cp;
    let vat = subtotal * vat_percent / 100.0;
    let total = subtotal + vat;

    Ok(AddOnBreakdown {
        direct_cost,
        ocm_percent,
        cp_percent,
        vat_percent,
        ocm,
        cp,
        subtotal,
        vat,
        total,
    })
}

// ==========================================
// Policy B - EDC bracket schedule
// ==========================================

/// One row of the indirect cost table; `upper_bound` is inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndirectCostBracket {
    pub upper_bound: Option<f64>,
    pub ocm_percent: f64,
    pub cp_percent: f64,
}

impl IndirectCostBracket {
    pub fn combined_percent(&self) -> f64 {
        self.ocm_percent + self.cp_percent
    }
}

/// Ascending by upper bound; the last row is open-ended
pub const INDIRECT_COST_BRACKETS: [IndirectCostBracket; 4] = [
    IndirectCostBracket {
        upper_bound: Some(5_000_000.0),
        ocm_percent: 15.0,
        cp_percent: 10.0,
    },
    IndirectCostBracket {
        upper_bound: Some(50_000_000.0),
        ocm_percent: 12.0,
        cp_percent: 8.0,
    },
    IndirectCostBracket {
        upper_bound: Some(150_000_000.0),
        ocm_percent: 10.0,
        cp_percent: 8.0,
    },
    IndirectCostBracket {
        upper_bound: None,
        ocm_percent: 8.0,
        cp_percent: 8.0,
    },
];

/// Bracket for an estimated direct cost
pub fn select_bracket(edc: f64) -> &'static IndirectCostBracket {
    INDIRECT_COST_BRACKETS
        .iter()
        .find(|b| b.upper_bound.map_or(true, |upper| edc <= upper))
        .unwrap_or(&INDIRECT_COST_BRACKETS[INDIRECT_COST_BRACKETS.len() - 1])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCostSummary {
    pub estimated_direct_cost: f64,
    pub bracket: IndirectCostBracket,
    pub ocm_percent: f64,
    pub cp_percent: f64,
    pub combined_percent: f64,
    pub ocm_amount: f64,
    pub cp_amount: f64,
    pub total: f64,
}

/// Project-level indirect cost from the EDC bracket table.
///
/// No VAT step; callers apply VAT separately when they need it.
pub fn compute_indirect_cost_schedule(edc: f64) -> EngineResult<IndirectCostSummary> {
    ensure_non_negative("estimated_direct_cost", edc)?;

    let bracket = *select_bracket(edc);
    let ocm_amount = edc * bracket.ocm_percent / 100.0;
    let cp_amount = edc * bracket.cp_percent / 100.0;

    Ok(IndirectCostSummary {
        estimated_direct_cost: edc,
        bracket,
        ocm_percent: bracket.ocm_percent,
        cp_percent: bracket.cp_percent,
        combined_percent: bracket.combined_percent(),
        ocm_amount,
        cp_amount,
        total: edc + ocm_amount + cp_amount,
    })
}

fn ensure_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::validation(
            field,
            format!("must be a finite value >= 0, got {}", value),
        ))
    }
}
