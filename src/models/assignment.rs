//! Passenger assignment model.
//!
//! An assignment books a bus for a passenger group starting on a given date.
//! Monthly assignments run for one calendar month; one-off assignments end on
//! the day they start.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::require_non_blank;
use crate::errors::AppError;
use crate::store::{Collection, FleetStore, Record, ResourceKind};

/// Passenger group carried under an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerType {
    Student,
    Teacher,
    Staff,
}

/// A bus booked for a passenger group over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub bus_id: String,
    /// Copy of the bus name at the time the assignment was written
    pub bus_name: String,
    pub passenger_type: PassengerType,
    pub passenger_count: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_monthly: bool,
    pub route_id: String,
    /// Fields written by other clients, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for creating an assignment.
///
/// `endDate` is not accepted here; it is derived from `startDate` and
/// `isMonthly`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub id: String,
    pub bus_id: String,
    #[serde(default)]
    pub bus_name: String,
    pub passenger_type: PassengerType,
    pub passenger_count: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub is_monthly: bool,
    pub route_id: String,
}

impl CreateAssignmentRequest {
    pub fn into_assignment(self) -> Result<Assignment, AppError> {
        let end_date = assignment_end_date(self.start_date, self.is_monthly)?;
        Ok(Assignment {
            id: self.id,
            bus_id: self.bus_id,
            bus_name: self.bus_name,
            passenger_type: self.passenger_type,
            passenger_count: self.passenger_count,
            start_date: self.start_date,
            end_date,
            is_monthly: self.is_monthly,
            route_id: self.route_id,
            extra: Map::new(),
        })
    }
}

/// End date of an assignment starting on `start`.
///
/// Monthly assignments advance one calendar month. When the target month is
/// shorter, the day is clamped to its last day (Jan 31 -> Feb 28/29).
pub fn assignment_end_date(start: NaiveDate, is_monthly: bool) -> Result<NaiveDate, AppError> {
    if !is_monthly {
        return Ok(start);
    }
    start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| AppError::Validation(format!("startDate {} is out of range", start)))
}

impl Record for Assignment {
    const KIND: ResourceKind = ResourceKind::Assignment;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("id", &self.id)?;
        require_non_blank("busId", &self.bus_id)?;
        require_non_blank("routeId", &self.route_id)?;
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "endDate must not be before startDate".to_string(),
            ));
        }
        Ok(())
    }

    fn collection(store: &FleetStore) -> &Collection<Self> {
        &store.assignments
    }
}
