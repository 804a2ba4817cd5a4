// ==========================================
// DUPA Estimator - API layer
// ==========================================
// Typed request validation and error mapping for an outer
// transport layer. No HTTP here.
// ==========================================

pub mod boq_api;
pub mod dto;
pub mod error;

pub use boq_api::BoqApi;
pub use dto::{InstantiateRequest, UpdateQuantityRequest};
pub use error::{ApiError, ApiResult};
