// ==========================================
// DUPA Estimator - Core library
// ==========================================
// Detailed Unit Price Analysis pricing and BOQ line item
// instantiation for public works cost estimates.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - pricing rules
pub mod engine;

// Configuration
pub mod config;

// Database infrastructure (connection setup, PRAGMAs, schema)
pub mod db;

// Logging
pub mod logging;

// API layer
pub mod api;

// Application wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::types::{InstantiationState, MarkupBasis, RateKind};

// Domain entities
pub use domain::{
    ComputedBoqLineItem, DupaTemplate, EquipmentRate, HaulingConfig, LaborRate, MaterialPrice,
    Project,
};

// Engines
pub use engine::{
    CostAggregator, HaulingCostModel, InstantiationEngine, ProjectCostSummarizer, RateResolver,
};

// API
pub use api::BoqApi;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "DUPA Estimator";
