use crate::config::types::Settings;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let settings: Settings = toml::from_str(&content)?;

    validate(&settings)?;

    Ok(settings)
}

/// Returns validated default settings
///
/// Used when no settings file is given on the command line.
pub fn default_settings() -> Result<Settings, ConfigError> {
    let settings = Settings::default();
    validate(&settings)?;
    Ok(settings)
}
