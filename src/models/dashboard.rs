//! Aggregates shown on the dashboard overview.

use serde::Serialize;

use super::{
    Ambulance, Assignment, Bus, BusCategory, Route, Schedule, VehicleStatus, Weekday,
};

/// Maximum number of schedules listed under "today".
pub const TODAY_SCHEDULE_LIMIT: usize = 5;

/// Maximum number of assignments listed as recent.
pub const RECENT_ASSIGNMENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub maintenance: usize,
    pub inactive: usize,
}

impl StatusCounts {
    fn tally(statuses: impl Iterator<Item = VehicleStatus>) -> Self {
        statuses.fold(Self::default(), |mut counts, status| {
            counts.total += 1;
            match status {
                VehicleStatus::Active => counts.active += 1,
                VehicleStatus::Maintenance => counts.maintenance += 1,
                VehicleStatus::Inactive => counts.inactive += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStats {
    #[serde(flatten)]
    pub status: StatusCounts,
    pub teacher: usize,
    pub student: usize,
    pub staff: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub total: usize,
    pub assigned_buses: usize,
    /// Mean stop count, rounded to the nearest whole stop
    pub average_stops: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    pub total: usize,
    pub monthly: usize,
    pub total_passengers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total: usize,
    pub active: usize,
    pub monday: usize,
    pub weekend: usize,
}

/// Everything the overview page renders, computed in one pass over the
/// five collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub buses: BusStats,
    pub ambulances: StatusCounts,
    pub routes: RouteStats,
    pub assignments: AssignmentStats,
    pub schedules: ScheduleStats,
    pub today: Weekday,
    pub today_schedules: Vec<Schedule>,
    /// First assignments in stored order
    pub recent_assignments: Vec<Assignment>,
}

impl DashboardStats {
    pub fn compute(
        buses: &[Bus],
        ambulances: &[Ambulance],
        routes: &[Route],
        assignments: &[Assignment],
        schedules: &[Schedule],
        today: Weekday,
    ) -> Self {
        let count_category =
            |category: BusCategory| buses.iter().filter(|b| b.category == category).count();

        let bus_stats = BusStats {
            status: StatusCounts::tally(buses.iter().map(|b| b.status)),
            teacher: count_category(BusCategory::Teacher),
            student: count_category(BusCategory::Student),
            staff: count_category(BusCategory::Staff),
        };

        let total_stops: usize = routes.iter().map(|r| r.stops.len()).sum();
        let average_stops = if routes.is_empty() {
            0
        } else {
            (total_stops as f64 / routes.len() as f64).round() as usize
        };

        let route_stats = RouteStats {
            total: routes.len(),
            assigned_buses: routes.iter().map(|r| r.assigned_buses.len()).sum(),
            average_stops,
        };

        let assignment_stats = AssignmentStats {
            total: assignments.len(),
            monthly: assignments.iter().filter(|a| a.is_monthly).count(),
            total_passengers: assignments.iter().map(|a| u64::from(a.passenger_count)).sum(),
        };

        let schedule_stats = ScheduleStats {
            total: schedules.len(),
            active: schedules.iter().filter(|s| s.is_active).count(),
            monday: schedules.iter().filter(|s| s.runs_on(Weekday::Monday)).count(),
            weekend: schedules
                .iter()
                .filter(|s| s.days.iter().any(|d| d.is_weekend()))
                .count(),
        };

        let today_schedules = schedules
            .iter()
            .filter(|s| s.is_active && s.runs_on(today))
            .take(TODAY_SCHEDULE_LIMIT)
            .cloned()
            .collect();

        let recent_assignments = assignments
            .iter()
            .take(RECENT_ASSIGNMENT_LIMIT)
            .cloned()
            .collect();

        Self {
            buses: bus_stats,
            ambulances: StatusCounts::tally(ambulances.iter().map(|a| a.status)),
            routes: route_stats,
            assignments: assignment_stats,
            schedules: schedule_stats,
            today,
            today_schedules,
            recent_assignments,
        }
    }
}
