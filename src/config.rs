//! Runtime configuration
//!
//! Read from the environment, with command-line flags applied on top by the
//! binary. Defaults live under the platform data directory
//! (`~/.local/share/pet-advisor` on Linux,
//! `~/Library/Application Support/pet-advisor` on macOS).

use std::path::PathBuf;

pub const SOURCE_ENV: &str = "PET_ADVISOR_SOURCE";
pub const DATA_DIR_ENV: &str = "PET_ADVISOR_DATA_DIR";
pub const PORT_ENV: &str = "PET_ADVISOR_PORT";

pub const DEFAULT_PORT: u16 = 3100;
const SOURCE_FILE: &str = "privacy.csv";
const SESSION_DB: &str = "sessions.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Questionnaire source table (`.csv` or `.json`)
    pub source_path: PathBuf,
    /// Directory holding the session database
    pub data_dir: PathBuf,
    pub port: u16,
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pet-advisor")
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty keys take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let source_path = get(SOURCE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(SOURCE_FILE));
        let port = get(PORT_ENV)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            source_path,
            data_dir,
            port,
        }
    }

    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_DB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.source_path, default_data_dir().join("privacy.csv"));
    }

    #[test]
    fn test_source_defaults_inside_data_dir() {
        let config = AdvisorConfig::from_lookup(lookup(&[(DATA_DIR_ENV, "/srv/pets")]));
        assert_eq!(config.source_path, PathBuf::from("/srv/pets/privacy.csv"));
        assert_eq!(config.session_db_path(), PathBuf::from("/srv/pets/sessions.db"));
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            (SOURCE_ENV, "/etc/pets/table.json"),
            (PORT_ENV, "not-a-port"),
        ]));
        assert_eq!(config.source_path, PathBuf::from("/etc/pets/table.json"));
        assert_eq!(config.port, DEFAULT_PORT);

        let config = AdvisorConfig::from_lookup(lookup(&[(PORT_ENV, " 8080 ")]));
        assert_eq!(config.port, 8080);
    }
}
