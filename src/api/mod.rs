//! REST API module.
//!
//! Every resource shares the same list/create/update/delete handlers, which
//! are generic over the stored [`Record`](crate::store::Record) type.

mod assignments;
mod auth;
mod dashboard;
mod records;

pub use assignments::*;
pub use auth::*;
pub use dashboard::*;
pub use records::*;

use serde::{Deserialize, Serialize};

/// Query string of `DELETE /api/{resource}?id=X`.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Body returned by operations with nothing else to report.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
