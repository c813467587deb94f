//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Environment variable overriding `repository.project_id`
pub const ENV_PROJECT_ID: &str = "LEGENDS_FIRESTORE_PROJECT";
/// Environment variable overriding `repository.api_key`
pub const ENV_API_KEY: &str = "LEGENDS_FIRESTORE_API_KEY";
/// Environment variable overriding `repository.base_url`
pub const ENV_BASE_URL: &str = "LEGENDS_FIRESTORE_URL";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults.
    ///
    /// An explicit `path` must exist. Without one, the standard locations are
    /// searched and defaults are used when none exists. Environment overrides
    /// are applied last, then the result is validated.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !Path::new(p).exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(PathBuf::from(p)),
            None => find_config_file(),
        };

        let mut schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        apply_overrides(&mut schema, |key| std::env::var(key).ok());
        validate(&schema)?;

        tracing::debug!(
            path = ?config_path,
            radius_km = schema.proximity.radius_km,
            "Configuration loaded"
        );

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        validate(&schema)?;
        Ok(Self { schema, path: None })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = ["legends.toml", ".legends.toml", ".config/legends.toml"]
        .into_iter()
        .map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("local-legends").join("legends.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))
}

/// Apply environment overrides for the repository section.
fn apply_overrides(schema: &mut ConfigSchema, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(project) = lookup(ENV_PROJECT_ID) {
        schema.repository.project_id = Some(project);
    }
    if let Some(key) = lookup(ENV_API_KEY) {
        schema.repository.api_key = Some(key);
    }
    if let Some(url) = lookup(ENV_BASE_URL) {
        schema.repository.base_url = url;
    }
}

/// Reject settings the rest of the toolkit cannot work with.
pub(crate) fn validate(schema: &ConfigSchema) -> Result<()> {
    let radius = schema.proximity.radius_km;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::invalid_config_value(
            "proximity.radius_km",
            format!("{radius} is not a positive number of kilometers"),
        ));
    }

    let location = &schema.location;
    if !(-90.0..=90.0).contains(&location.fallback_latitude)
        || !(-180.0..=180.0).contains(&location.fallback_longitude)
    {
        return Err(Error::invalid_config_value(
            "location.fallback_latitude/fallback_longitude",
            format!(
                "({}, {}) is not a valid coordinate",
                location.fallback_latitude, location.fallback_longitude
            ),
        ));
    }
    if location.timeout_secs == 0 {
        return Err(Error::invalid_config_value("location.timeout_secs", "cannot be zero"));
    }

    let repository = &schema.repository;
    if !repository.base_url.starts_with("http://") && !repository.base_url.starts_with("https://")
    {
        return Err(Error::invalid_config_value(
            "repository.base_url",
            "must start with http:// or https://",
        ));
    }
    if repository.timeout_secs == 0 {
        return Err(Error::invalid_config_value("repository.timeout_secs", "cannot be zero"));
    }
    if repository.page_size == 0 {
        return Err(Error::invalid_config_value("repository.page_size", "cannot be zero"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use crate::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.proximity.radius_km, 50.0);
        assert_eq!(config.schema.location.fallback_latitude, -37.81);
        assert_eq!(config.schema.repository.hidden_gems_collection, "legendsWgem");
        assert!(validate(&config.schema).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[proximity]
radius_km = 25.0
sort_by_distance = true

[repository]
project_id = "local-legends-dev"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.schema.proximity.radius_km, 25.0);
        assert!(config.schema.proximity.sort_by_distance);
        assert_eq!(config.schema.logging.format, LogFormat::Json);
        assert_eq!(config.schema.repository.legends_collection, "legends");
        assert_eq!(config.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some("/definitely/not/here/legends.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_parse_error_has_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[proximity\nradius_km = ").unwrap();

        let err = Config::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = Config::from_toml_str("[proximity]\nradius_km = 0.0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_rejects_invalid_fallback() {
        let err = Config::from_toml_str("[location]\nfallback_latitude = 120.0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        assert!(Config::from_toml_str("[repository]\npage_size = 0\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut schema = ConfigSchema::default();
        apply_overrides(&mut schema, |key| match key {
            ENV_PROJECT_ID => Some("legends-prod".to_string()),
            ENV_BASE_URL => Some("http://localhost:8080/v1".to_string()),
            _ => None,
        });

        assert_eq!(schema.repository.project_id.as_deref(), Some("legends-prod"));
        assert_eq!(schema.repository.base_url, "http://localhost:8080/v1");
        assert!(schema.repository.api_key.is_none());
    }
}
