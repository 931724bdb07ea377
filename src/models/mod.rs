//! Data models for the fleet dashboard.
//!
//! Field names serialize in camelCase to match the dashboard's JSON files and
//! request bodies.

mod assignment;
mod dashboard;
mod route;
mod schedule;
mod vehicle;

pub use assignment::*;
pub use dashboard::*;
pub use route::*;
pub use schedule::*;
pub use vehicle::*;

use crate::errors::AppError;

/// Reject empty or whitespace-only required text fields.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
