//! The record contract shared by every stored resource type.

use serde::{de::DeserializeOwned, Serialize};

use super::{Collection, FleetStore};
use crate::errors::AppError;

/// The five resource types kept by the store, one backing file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Bus,
    Ambulance,
    Route,
    Assignment,
    Schedule,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Bus,
        ResourceKind::Ambulance,
        ResourceKind::Route,
        ResourceKind::Assignment,
        ResourceKind::Schedule,
    ];

    /// Lowercase singular name used in messages ("bus").
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Bus => "bus",
            ResourceKind::Ambulance => "ambulance",
            ResourceKind::Route => "route",
            ResourceKind::Assignment => "assignment",
            ResourceKind::Schedule => "schedule",
        }
    }

    /// Lowercase plural name, also the API path segment ("buses").
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Bus => "buses",
            ResourceKind::Ambulance => "ambulances",
            ResourceKind::Route => "routes",
            ResourceKind::Assignment => "assignments",
            ResourceKind::Schedule => "schedules",
        }
    }

    /// Capitalized singular name ("Bus").
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Bus => "Bus",
            ResourceKind::Ambulance => "Ambulance",
            ResourceKind::Route => "Route",
            ResourceKind::Assignment => "Assignment",
            ResourceKind::Schedule => "Schedule",
        }
    }

    /// Name of the backing file inside the data directory.
    pub fn file_name(self) -> String {
        format!("{}.json", self.plural())
    }
}

/// A stored entity: serializable, identified by a string `id`, and living in
/// exactly one collection of the [`FleetStore`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    /// Field-level checks run before a record is written.
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn collection(store: &FleetStore) -> &Collection<Self>;
}
