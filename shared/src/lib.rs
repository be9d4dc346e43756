//! Shared types for the Conch storefront
//!
//! Common types used by the store server and its clients:
//! unified error system, API response envelope and auth wire DTOs.

pub mod client;
pub mod error;
pub mod util;

// Re-exports
pub use http;

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
