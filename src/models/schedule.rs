//! Weekly departure schedule model.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::require_non_blank;
use crate::errors::AppError;
use crate::store::{Collection, FleetStore, Record, ResourceKind};

/// Day of the week, serialized by its full English name ("Monday").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// A recurring departure of one bus on one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub bus_id: String,
    /// Copy of the bus name at write time
    pub bus_name: String,
    pub route_id: String,
    /// Copy of the route name at write time
    pub route_name: String,
    /// "HH:MM", 24-hour clock
    pub departure_time: String,
    /// "HH:MM", 24-hour clock
    pub arrival_time: String,
    #[serde(default)]
    pub days: Vec<Weekday>,
    pub is_active: bool,
    /// Fields written by other clients, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schedule {
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

fn require_clock_time(field: &str, value: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("{} must be HH:MM", field)))
}

impl Record for Schedule {
    const KIND: ResourceKind = ResourceKind::Schedule;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("id", &self.id)?;
        require_non_blank("busId", &self.bus_id)?;
        require_non_blank("routeId", &self.route_id)?;
        require_clock_time("departureTime", &self.departure_time)?;
        require_clock_time("arrivalTime", &self.arrival_time)?;

        // days is a set
        for (i, day) in self.days.iter().enumerate() {
            if self.days[..i].contains(day) {
                return Err(AppError::Validation(format!("{:?} listed twice in days", day)));
            }
        }
        Ok(())
    }

    fn collection(store: &FleetStore) -> &Collection<Self> {
        &store.schedules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(days: Vec<Weekday>) -> Schedule {
        Schedule {
            id: "sched-1".into(),
            bus_id: "bus-1".into(),
            bus_name: "Bus One".into(),
            route_id: "route-1".into(),
            route_name: "Campus Loop".into(),
            departure_time: "07:30".into(),
            arrival_time: "08:15".into(),
            days,
            is_active: true,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_weekday_serializes_full_name() {
        let value = serde_json::to_value(Weekday::Wednesday).unwrap();
        assert_eq!(value, "Wednesday");
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }

    #[test]
    fn test_duplicate_days_rejected() {
        let s = schedule(vec![Weekday::Monday, Weekday::Monday]);
        assert!(matches!(s.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_bad_clock_time_rejected() {
        let mut s = schedule(vec![Weekday::Friday]);
        assert!(s.validate().is_ok());
        s.arrival_time = "8.15am".into();
        assert!(matches!(s.validate(), Err(AppError::Validation(_))));
    }
}
