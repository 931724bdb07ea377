//! Dashboard overview endpoint.

use axum::{extract::State, Json};
use chrono::{Datelike, Local};

use crate::errors::AppError;
use crate::models::DashboardStats;
use crate::AppState;

/// GET /api/dashboard - Aggregates across all five collections.
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let store = &state.store;
    let (buses, ambulances, routes, assignments, schedules) = tokio::try_join!(
        store.buses.get_all(),
        store.ambulances.get_all(),
        store.routes.get_all(),
        store.assignments.get_all(),
        store.schedules.get_all(),
    )
    .map_err(|e| e.or_store_message("Failed to read dashboard data"))?;

    let today = Local::now().weekday().into();
    Ok(Json(DashboardStats::compute(
        &buses,
        &ambulances,
        &routes,
        &assignments,
        &schedules,
        today,
    )))
}
