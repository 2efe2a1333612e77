use pubg_shared::maps::MapRegistry;
use pubg_shared::models::MapProfile;
use std::io::ErrorKind;
use std::path::Path;

pub struct Assets {
    pub maps: MapRegistry,
}

impl Assets {
    /// Load `maps.json` from `assets_dir`, falling back to the built-in map table
    /// when the file does not exist.
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let maps_path = assets_dir.join("maps.json");

        let maps = match std::fs::read_to_string(&maps_path) {
            Ok(data) => MapRegistry::from_json(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %maps_path.display(), "maps.json not found, using built-in maps");
                MapRegistry::builtin()
            }
            Err(e) => return Err(format!("Failed to read {}: {}", maps_path.display(), e)),
        };

        tracing::info!(maps = maps.all().len(), "Loaded game assets");

        Ok(Assets { maps })
    }

    #[cfg(test)]
    pub fn builtin() -> Self {
        Assets {
            maps: MapRegistry::builtin(),
        }
    }

    /// Profile for `id`; unknown ids get the default map size.
    pub fn map_or_default(&self, id: &str) -> MapProfile {
        self.maps.profile_or_default(id)
    }
}
