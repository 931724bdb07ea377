//! Flat-file persistence for the fleet dashboard.
//!
//! Each resource type lives in its own JSON array file under the data
//! directory. The files are the source of truth: there are no indices, no
//! cross-file constraints, and reference fields such as `busId` are not
//! checked against the other collections.

mod collection;
mod record;

pub use collection::*;
pub use record::*;

use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::{Ambulance, Assignment, Bus, Route, Schedule};

/// The five collections of the dashboard, opened from one data directory.
pub struct FleetStore {
    data_dir: PathBuf,
    pub buses: Collection<Bus>,
    pub ambulances: Collection<Ambulance>,
    pub routes: Collection<Route>,
    pub assignments: Collection<Assignment>,
    pub schedules: Collection<Schedule>,
}

impl FleetStore {
    /// Open the store, creating the directory and any missing collection file.
    pub async fn open(data_dir: &Path, allow_duplicate_ids: bool) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
            AppError::StoreUnavailable(format!(
                "Failed to create data directory {:?}: {}",
                data_dir, e
            ))
        })?;

        let path = |kind: ResourceKind| data_dir.join(kind.file_name());
        let store = Self {
            data_dir: data_dir.to_path_buf(),
            buses: Collection::new(path(ResourceKind::Bus), allow_duplicate_ids),
            ambulances: Collection::new(path(ResourceKind::Ambulance), allow_duplicate_ids),
            routes: Collection::new(path(ResourceKind::Route), allow_duplicate_ids),
            assignments: Collection::new(path(ResourceKind::Assignment), allow_duplicate_ids),
            schedules: Collection::new(path(ResourceKind::Schedule), allow_duplicate_ids),
        };

        store.buses.ensure_exists().await?;
        store.ambulances.ensure_exists().await?;
        store.routes.ensure_exists().await?;
        store.assignments.ensure_exists().await?;
        store.schedules.ensure_exists().await?;

        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusCategory, VehicleStatus};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_seeds_every_collection() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested").join("data");
        let store = FleetStore::open(&data_dir, false).await.unwrap();

        for kind in ResourceKind::ALL {
            let text = std::fs::read_to_string(data_dir.join(kind.file_name())).unwrap();
            assert_eq!(text.trim(), "[]");
        }
        assert!(store.schedules.get_all().await.unwrap().is_empty());
        assert_eq!(store.data_dir(), data_dir.as_path());
    }

    #[tokio::test]
    async fn test_record_resolves_its_collection() {
        let dir = TempDir::new().unwrap();
        let store = FleetStore::open(dir.path(), false).await.unwrap();

        let bus = Bus {
            id: "bus-1".into(),
            name: "Bus One".into(),
            category: BusCategory::Student,
            capacity: 40,
            status: VehicleStatus::Active,
            registration_number: "REG-1".into(),
            current_route: None,
            extra: Default::default(),
        };
        Bus::collection(&store).append(bus.clone()).await.unwrap();

        assert_eq!(store.buses.get_all().await.unwrap(), vec![bus]);
        assert!(store.ambulances.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unmodelled_fields_survive_other_writes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("buses.json"),
            r#"[{"id":"bus-0","name":"Bus Zero","type":"staff","capacity":20,
                "status":"active","registrationNumber":"REG-0","driver":"Karim"}]"#,
        )
        .unwrap();
        let store = FleetStore::open(dir.path(), false).await.unwrap();

        let bus = Bus {
            id: "bus-1".into(),
            name: "Bus One".into(),
            category: BusCategory::Student,
            capacity: 40,
            status: VehicleStatus::Active,
            registration_number: "REG-1".into(),
            current_route: None,
            extra: Default::default(),
        };
        store.buses.append(bus).await.unwrap();
        store.buses.delete_by_key("nope").await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("buses.json")).unwrap();
        let stored: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["driver"], "Karim");
        assert_eq!(stored[0]["type"], "staff");
        assert!(stored[1].get("driver").is_none());

        let found = store.buses.find_by_key("bus-0").await.unwrap().unwrap();
        assert_eq!(found.extra["driver"], "Karim");
    }

    #[tokio::test]
    async fn test_reopen_sees_existing_records() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("ambulances.json"),
            r#"[{"id":"amb-1","name":"Unit 1","status":"maintenance","emergencyContact":"999"}]"#,
        )
        .unwrap();

        let store = FleetStore::open(dir.path(), false).await.unwrap();
        let ambulances = store.ambulances.get_all().await.unwrap();
        assert_eq!(ambulances.len(), 1);
        assert_eq!(ambulances[0].status, VehicleStatus::Maintenance);
    }
}
