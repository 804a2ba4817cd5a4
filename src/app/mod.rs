// ==========================================
// DUPA Estimator - Application layer
// ==========================================
// Wires repositories, engine and API over one shared connection.
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
