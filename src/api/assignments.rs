//! Assignment API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::records::insert_record;
use crate::errors::AppError;
use crate::models::{Assignment, CreateAssignmentRequest};
use crate::AppState;

/// POST /api/assignments - Create an assignment, deriving its end date.
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = request.into_assignment()?;
    insert_record(&state, assignment).await
}
