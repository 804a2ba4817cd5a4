// ==========================================
// DUPA Estimator - Domain type definitions
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Rate kind (master data lookup key)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateKind {
    Labor,
    Equipment,
    Material,
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl RateKind {
    /// Stored string form
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RateKind::Labor => "LABOR",
            RateKind::Equipment => "EQUIPMENT",
            RateKind::Material => "MATERIAL",
        }
    }
}

// ==========================================
// Markup basis
// ==========================================
// Which percentage set of the template priced a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkupBasis {
    Standard,  // template's stored OCM/CP/VAT
    Evaluated, // alternate evaluated set
}

impl fmt::Display for MarkupBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupBasis::Standard => write!(f, "STANDARD"),
            MarkupBasis::Evaluated => write!(f, "EVALUATED"),
        }
    }
}

// ==========================================
// Instantiation state
// ==========================================
// Draft -> ResolvingRates -> Computed | Failed(reason)
// Computed and Failed are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstantiationState {
    Draft,
    ResolvingRates,
    Computed,
    Failed(String),
}

impl InstantiationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstantiationState::Computed | InstantiationState::Failed(_)
        )
    }

    /// Whether `self -> next` is an allowed transition
    pub fn can_transition_to(&self, next: &InstantiationState) -> bool {
        match (self, next) {
            (InstantiationState::Draft, InstantiationState::ResolvingRates) => true,
            (InstantiationState::ResolvingRates, InstantiationState::Computed) => true,
            (current, InstantiationState::Failed(_)) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for InstantiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstantiationState::Draft => write!(f, "DRAFT"),
            InstantiationState::ResolvingRates => write!(f, "RESOLVING_RATES"),
            InstantiationState::Computed => write!(f, "COMPUTED"),
            InstantiationState::Failed(reason) => write!(f, "FAILED({})", reason),
        }
    }
}
