//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{PostgreSQLConfig, SyncConfig};
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "poi-sync.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "POI_SYNC_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (POI_SYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, the TOML is malformed, an override can't
/// be parsed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use poi_sync::config::loader::load_config;
///
/// let config = load_config("poi-sync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let config = load_config_unvalidated(path)?;

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration and applies overrides without validating
///
/// For callers that apply further overrides (such as CLI flags) and
/// validate afterwards.
pub fn load_config_unvalidated(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parses TOML text after `${VAR}` substitution, without validating
pub fn parse_config(contents: &str) -> Result<SyncConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }

            re.replace_all(line, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        SyncError::Configuration(format!("Invalid value '{value}' for {key}: {e}"))
    })
}

/// Applies environment variable overrides using the POI_SYNC_* prefix
///
/// Variables follow the pattern `POI_SYNC_<SECTION>_<KEY>`, for example
/// `POI_SYNC_CATALOG_BASE_URL` or `POI_SYNC_IMPORT_PAGE_SIZE`. `lookup`
/// resolves a variable name to its value.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] when a numeric or boolean override
/// doesn't parse.
pub fn apply_env_overrides<F>(config: &mut SyncConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));
    let parsed = |key: &str| -> Option<(String, String)> {
        var(key).map(|value| (format!("{ENV_PREFIX}{key}"), value))
    };

    // Application
    if let Some(val) = var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some((key, val)) = parsed("APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override(&key, &val)?;
    }

    // Catalog
    if let Some(val) = var("CATALOG_BASE_URL") {
        config.catalog.base_url = val;
    }
    if let Some(val) = var("CATALOG_API_KEY") {
        config.catalog.api_key = secret_string(val);
    }
    if let Some((key, val)) = parsed("CATALOG_TIMEOUT_MS") {
        config.catalog.timeout_ms = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("CATALOG_RETRY_MAX_RETRIES") {
        config.catalog.retry.max_retries = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("CATALOG_RETRY_MIN_DELAY_MS") {
        config.catalog.retry.min_delay_ms = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("CATALOG_RETRY_MAX_DELAY_MS") {
        config.catalog.retry.max_delay_ms = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("CATALOG_RETRY_JITTER_RATIO") {
        config.catalog.retry.jitter_ratio = parse_override(&key, &val)?;
    }

    // Import
    if let Some((key, val)) = parsed("IMPORT_CONCURRENCY") {
        config.import.concurrency = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("IMPORT_PAGE_SIZE") {
        config.import.page_size = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("IMPORT_MAX_PAGES") {
        config.import.max_pages = parse_override(&key, &val)?;
    }
    if let Some((key, val)) = parsed("IMPORT_START_OFFSET") {
        config.import.start_offset = parse_override(&key, &val)?;
    }
    if let Some(val) = var("IMPORT_DATASET") {
        config.import.dataset = Some(val);
    }
    if let Some(val) = var("IMPORT_MODIFIED_SINCE") {
        config.import.modified_since = Some(val);
    }

    // PostgreSQL; a connection string alone is enough to create the section
    if let Some(val) = var("POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql.as_mut() {
            Some(pg) => pg.connection_string = secret_string(val),
            None => config.postgresql = Some(PostgreSQLConfig::new(secret_string(val))),
        }
    }
    if let Some(pg) = config.postgresql.as_mut() {
        if let Some((key, val)) = parsed("POSTGRESQL_MAX_CONNECTIONS") {
            pg.max_connections = parse_override(&key, &val)?;
        }
        if let Some(val) = var("POSTGRESQL_TABLE") {
            pg.table = val;
        }
    }

    // Logging
    if let Some(val) = var("LOGGING_FORMAT") {
        config.logging.format = val;
    }
    if let Some((key, val)) = parsed("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override(&key, &val)?;
    }
    if let Some(val) = var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("POI_SYNC_LOADER_TEST_KEY", "test_value");
        let input = "api_key = \"${POI_SYNC_LOADER_TEST_KEY}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"");
        std::env::remove_var("POI_SYNC_LOADER_TEST_KEY");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let input = "api_key = \"${POI_SYNC_LOADER_DEFINITELY_UNSET}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("POI_SYNC_LOADER_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# api_key = \"${POI_SYNC_LOADER_COMMENTED_OUT}\"\nx = 1";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-poi-sync.toml");
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[test]
    fn test_parse_config_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.catalog.timeout_ms, 8000);
        assert_eq!(config.import.page_size, 100);
        assert!(config.postgresql.is_none());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[catalog]
base_url = "https://catalog.example.com/v3"
api_key = "k-123"
timeout_ms = 5000

[catalog.retry]
max_retries = 2

[import]
concurrency = 4
page_size = 50

[postgresql]
connection_string = "postgresql://u:p@localhost:5432/pois"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.catalog.base_url, "https://catalog.example.com/v3");
        assert_eq!(config.catalog.api_key.expose_secret(), "k-123");
        assert_eq!(config.catalog.retry.max_retries, 2);
        assert_eq!(config.catalog.retry.min_delay_ms, 250);
        assert_eq!(config.import.concurrency, 4);
        assert_eq!(config.postgresql.unwrap().table, "pois");
    }

    #[test]
    fn test_env_overrides_applied() {
        let mut config = parse_config("").unwrap();
        let vars = env(&[
            ("POI_SYNC_APPLICATION_DRY_RUN", "true"),
            ("POI_SYNC_CATALOG_API_KEY", "from-env"),
            ("POI_SYNC_IMPORT_PAGE_SIZE", "250"),
            ("POI_SYNC_IMPORT_DATASET", "eu"),
            ("POI_SYNC_CATALOG_RETRY_JITTER_RATIO", "0.5"),
        ]);

        apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap();

        assert!(config.application.dry_run);
        assert_eq!(config.catalog.api_key.expose_secret(), "from-env");
        assert_eq!(config.import.page_size, 250);
        assert_eq!(config.import.dataset.as_deref(), Some("eu"));
        assert_eq!(config.catalog.retry.jitter_ratio, 0.5);
    }

    #[test]
    fn test_env_connection_string_creates_section() {
        let mut config = parse_config("").unwrap();
        let vars = env(&[
            ("POI_SYNC_POSTGRESQL_CONNECTION_STRING", "postgres://localhost/db"),
            ("POI_SYNC_POSTGRESQL_TABLE", "stations"),
        ]);

        apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap();

        let pg = config.postgresql.unwrap();
        assert_eq!(pg.connection_string.expose_secret(), "postgres://localhost/db");
        assert_eq!(pg.table, "stations");
    }

    #[test]
    fn test_env_override_parse_failure_is_error() {
        let mut config = parse_config("").unwrap();
        let vars = env(&[("POI_SYNC_IMPORT_PAGE_SIZE", "lots")]);

        let err = apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("POI_SYNC_IMPORT_PAGE_SIZE"));
    }
}
