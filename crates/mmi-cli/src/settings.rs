//! Layered settings: built-in defaults, then a settings file, then
//! `MMI_`-prefixed environment variables (`MMI_DATABASE__URL`, ...).

use config::{Config, ConfigError, Environment, File};
use mmi_db::{DatabaseConfig, DEFAULT_DATABASE_URL, TASKS_COLLECTION};
use serde::Deserialize;
use std::path::Path;

/// Looked up in the working directory with any supported extension.
const DEFAULT_SETTINGS_FILE: &str = "mmi";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Settings {
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("database.collection", TASKS_COLLECTION)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
        };

        builder.add_source(environment).build()?.try_deserialize()
    }
}

/// `MMI_DATABASE__URL` maps to `database.url`.
fn environment() -> Environment {
    Environment::with_prefix("MMI")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_vars(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nurl = \"postgres://db.internal/tasks\"\nmax_connections = 2"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.database.url, "postgres://db.internal/tasks");
        assert_eq!(settings.database.max_connections, 2);
        assert_eq!(settings.database.collection, TASKS_COLLECTION);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let settings = Settings::load_with(
            None,
            env_vars(&[
                ("MMI_DATABASE__URL", "postgres://from-env/tasks"),
                ("MMI_DATABASE__COLLECTION", "env_tasks"),
                ("MMI_DATABASE__MAX_CONNECTIONS", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.database.url, "postgres://from-env/tasks");
        assert_eq!(settings.database.collection, "env_tasks");
        assert_eq!(settings.database.max_connections, 3);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[database]\nurl = \"postgres://from-file/tasks\"").unwrap();

        let settings = Settings::load_with(
            Some(file.path()),
            env_vars(&[("MMI_DATABASE__URL", "postgres://from-env/tasks")]),
        )
        .unwrap();
        assert_eq!(settings.database.url, "postgres://from-env/tasks");
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let settings =
            Settings::load_with(None, env_vars(&[("DATABASE__URL", "postgres://elsewhere/x")]))
                .unwrap();
        assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
    }
}
