//! Bus and ambulance models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::require_non_blank;
use crate::errors::AppError;
use crate::store::{Collection, FleetStore, Record, ResourceKind};

/// Passenger group a bus is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusCategory {
    Teacher,
    Student,
    Staff,
}

/// Operational status shared by buses and ambulances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

/// A bus in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: BusCategory,
    pub capacity: u32,
    pub status: VehicleStatus,
    pub registration_number: String,
    /// Route id the bus is currently running, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_route: Option<String>,
    /// Fields written by other clients, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ambulance on standby for the campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    pub id: String,
    pub name: String,
    pub status: VehicleStatus,
    pub emergency_contact: String,
    /// Fields written by other clients, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Bus {
    const KIND: ResourceKind = ResourceKind::Bus;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("id", &self.id)?;
        require_non_blank("name", &self.name)?;
        require_non_blank("registrationNumber", &self.registration_number)
    }

    fn collection(store: &FleetStore) -> &Collection<Self> {
        &store.buses
    }
}

impl Record for Ambulance {
    const KIND: ResourceKind = ResourceKind::Ambulance;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("id", &self.id)?;
        require_non_blank("name", &self.name)
    }

    fn collection(store: &FleetStore) -> &Collection<Self> {
        &store.ambulances
    }
}
