//! Generic collection endpoints shared by all resource types.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{IdQuery, SuccessResponse};
use crate::errors::AppError;
use crate::store::Record;
use crate::AppState;

/// GET /api/{resource} - List every record in stored order.
pub async fn list_records<R: Record>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R>>, AppError> {
    let records = R::collection(&state.store)
        .get_all()
        .await
        .map_err(|e| e.or_store_message(format!("Failed to read {} data", R::KIND.plural())))?;

    Ok(Json(records))
}

/// GET /api/{resource}/{id} - Get a single record.
pub async fn get_record<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError> {
    let record = R::collection(&state.store)
        .find_by_key(&id)
        .await
        .map_err(|e| e.or_store_message(format!("Failed to read {} data", R::KIND.plural())))?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", R::KIND.label())))?;

    Ok(Json(record))
}

/// POST /api/{resource} - Append a record with a client-supplied id.
pub async fn create_record<R: Record>(
    State(state): State<AppState>,
    Json(record): Json<R>,
) -> Result<(StatusCode, Json<R>), AppError> {
    insert_record(&state, record).await
}

/// Validate and append `record`, answering 201 with the stored record.
pub(super) async fn insert_record<R: Record>(
    state: &AppState,
    record: R,
) -> Result<(StatusCode, Json<R>), AppError> {
    record.validate()?;

    let stored = R::collection(&state.store)
        .append(record)
        .await
        .map_err(|e| e.or_store_message(format!("Failed to create {}", R::KIND.singular())))?;

    tracing::info!("Created {} {}", R::KIND.singular(), stored.id());
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /api/{resource} - Replace the record whose id matches the body's id.
pub async fn update_record<R: Record>(
    State(state): State<AppState>,
    Json(record): Json<R>,
) -> Result<Json<R>, AppError> {
    record.validate()?;

    let id = record.id().to_string();
    let stored = R::collection(&state.store)
        .replace_by_key(&id, record)
        .await
        .map_err(|e| e.or_store_message(format!("Failed to update {}", R::KIND.singular())))?;

    tracing::info!("Updated {} {}", R::KIND.singular(), id);
    Ok(Json(stored))
}

/// DELETE /api/{resource}?id=X - Remove every record with that id.
pub async fn delete_record<R: Record>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} ID required", R::KIND.label())))?;

    let removed = R::collection(&state.store)
        .delete_by_key(&id)
        .await
        .map_err(|e| e.or_store_message(format!("Failed to delete {}", R::KIND.singular())))?;

    tracing::info!("Deleted {} {} ({} removed)", R::KIND.singular(), id, removed);
    Ok(Json(SuccessResponse::ok()))
}
