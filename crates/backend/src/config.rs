use std::path::PathBuf;

pub struct Config {
    pub assets_dir: PathBuf,
    pub db_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let assets_dir = PathBuf::from(lookup("ASSETS_DIR").unwrap_or_else(|| "assets".to_string()));
        let db_path =
            PathBuf::from(lookup("DB_PATH").unwrap_or_else(|| "data/plans.redb".to_string()));
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("Invalid PORT {:?}: {}", raw, e))?,
            None => 3000,
        };
        Ok(Config {
            assets_dir,
            db_path,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
