//! Route model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::require_non_blank;
use crate::errors::AppError;
use crate::store::{Collection, FleetStore, Record, ResourceKind};

/// A bus route between two points with ordered intermediate stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub name: String,
    pub start_point: String,
    pub end_point: String,
    #[serde(default)]
    pub stops: Vec<String>,
    /// Display string, e.g. "12 km"
    pub distance: String,
    /// Display string, e.g. "35 min"
    pub estimated_time: String,
    /// Bus ids attached when the route was created
    #[serde(default)]
    pub assigned_buses: Vec<String>,
    /// Fields written by other clients, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Route {
    const KIND: ResourceKind = ResourceKind::Route;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("id", &self.id)?;
        require_non_blank("name", &self.name)?;
        require_non_blank("startPoint", &self.start_point)?;
        require_non_blank("endPoint", &self.end_point)?;
        if self.stops.iter().any(|stop| stop.trim().is_empty()) {
            return Err(AppError::Validation("stops must not be blank".to_string()));
        }

        // assignedBuses is a set
        for (i, bus_id) in self.assigned_buses.iter().enumerate() {
            if self.assigned_buses[..i].contains(bus_id) {
                return Err(AppError::Validation(format!(
                    "{} listed twice in assignedBuses",
                    bus_id
                )));
            }
        }
        Ok(())
    }

    fn collection(store: &FleetStore) -> &Collection<Self> {
        &store.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(assigned_buses: &[&str]) -> Route {
        Route {
            id: "route-1".into(),
            name: "Campus Loop".into(),
            start_point: "Main Gate".into(),
            end_point: "Library".into(),
            stops: vec!["Science Block".into()],
            distance: "4 km".into(),
            estimated_time: "15 min".into(),
            assigned_buses: assigned_buses.iter().map(|s| s.to_string()).collect(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_assigned_buses_must_be_distinct() {
        assert!(route(&["bus-1", "bus-2"]).validate().is_ok());
        assert!(matches!(
            route(&["bus-1", "bus-2", "bus-1"]).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_stop_rejected() {
        let mut r = route(&[]);
        r.stops.push("  ".into());
        assert!(matches!(r.validate(), Err(AppError::Validation(_))));
    }
}
