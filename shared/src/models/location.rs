//! Monitored canal locations

/// A monitored location along the canal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Short key used in URLs and as `sensorId` on the wire
    pub id: &'static str,

    /// Value stored in the `location` field of every aggregate document
    pub name: &'static str,
}

/// All monitored locations, in dashboard order
pub static LOCATIONS: [Location; 3] = [
    Location {
        id: "dows",
        name: "Dow's Lake",
    },
    Location {
        id: "fifth",
        name: "Fifth Avenue",
    },
    Location {
        id: "nac",
        name: "NAC",
    },
];

impl Location {
    /// Look up a registered location by its short id
    pub fn by_id(id: &str) -> Option<&'static Location> {
        LOCATIONS.iter().find(|loc| loc.id == id)
    }

    /// Look up a registered location by its stored display name
    pub fn by_name(name: &str) -> Option<&'static Location> {
        LOCATIONS.iter().find(|loc| loc.name == name)
    }

    /// Iterate the registry in dashboard order
    pub fn all() -> impl Iterator<Item = &'static Location> {
        LOCATIONS.iter()
    }
}
