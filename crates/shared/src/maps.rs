use crate::models::MapProfile;

/// Size used for map ids missing from the registry.
pub const DEFAULT_MAP_SIZE_M: f64 = 8000.0;

/// Built-in maps: (id, display name, size in meters).
const BUILTIN_MAPS: [(&str, &str, f64); 9] = [
    ("erangel", "Erangel", 8000.0),
    ("miramar", "Miramar", 8000.0),
    ("sanhok", "Sanhok", 4000.0),
    ("vikendi", "Vikendi", 6000.0),
    ("karakin", "Karakin", 2000.0),
    ("paramo", "Paramo", 3000.0),
    ("haven", "Haven", 1500.0),
    ("taego", "Taego", 8000.0),
    ("deston", "Deston", 8000.0),
];

/// Read-only lookup from map id to its profile.
#[derive(Debug, Clone)]
pub struct MapRegistry {
    maps: Vec<MapProfile>,
}

impl MapRegistry {
    pub fn builtin() -> Self {
        let maps = BUILTIN_MAPS
            .iter()
            .map(|(id, name, size)| MapProfile {
                id: id.to_string(),
                name: name.to_string(),
                size_in_meters: *size,
                image: format!("img/{}.png", id),
                active: true,
            })
            .collect();
        MapRegistry { maps }
    }

    /// Build a registry from a JSON array of profiles.
    pub fn from_json(data: &str) -> Result<Self, String> {
        let maps: Vec<MapProfile> =
            serde_json::from_str(data).map_err(|e| format!("Failed to parse maps: {}", e))?;
        Self::from_profiles(maps)
    }

    pub fn from_profiles(maps: Vec<MapProfile>) -> Result<Self, String> {
        for map in &maps {
            map.validate().map_err(|e| e.to_string())?;
        }
        Ok(MapRegistry { maps })
    }

    pub fn all(&self) -> &[MapProfile] {
        &self.maps
    }

    pub fn get(&self, id: &str) -> Option<&MapProfile> {
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn size_or_default(&self, id: &str) -> f64 {
        self.get(id)
            .map(|m| m.size_in_meters)
            .unwrap_or(DEFAULT_MAP_SIZE_M)
    }

    /// Profile for `id`, or a synthesized one sized [`DEFAULT_MAP_SIZE_M`].
    pub fn profile_or_default(&self, id: &str) -> MapProfile {
        match self.get(id) {
            Some(map) => map.clone(),
            None => MapProfile {
                id: id.to_string(),
                name: id.to_string(),
                size_in_meters: DEFAULT_MAP_SIZE_M,
                image: format!("img/{}.png", id),
                active: false,
            },
        }
    }
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
