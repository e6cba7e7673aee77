use crate::config::types::{FetchSettings, OutputSettings, Settings, UserAgentSettings};
use crate::ConfigError;

/// Validates the entire settings block
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_fetch_settings(&settings.fetch)?;
    validate_user_agent_settings(&settings.user_agent)?;
    validate_output_settings(&settings.output)?;
    Ok(())
}

/// Validates fetch retry and timeout settings
fn validate_fetch_settings(settings: &FetchSettings) -> Result<(), ConfigError> {
    if settings.max_attempts < 1 || settings.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            settings.max_attempts
        )));
    }

    if settings.initial_backoff_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "initial_backoff_secs must be >= 1, got {}",
            settings.initial_backoff_secs
        )));
    }

    if settings.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            settings.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the user agent identity
fn validate_user_agent_settings(settings: &UserAgentSettings) -> Result<(), ConfigError> {
    if settings.bot_name.is_empty() {
        return Err(ConfigError::Validation(
            "bot_name cannot be empty".to_string(),
        ));
    }

    if settings.task_name.is_empty() {
        return Err(ConfigError::Validation(
            "task_name cannot be empty".to_string(),
        ));
    }

    validate_email(&settings.contact_email)?;

    Ok(())
}

/// Validates output settings
fn validate_output_settings(settings: &OutputSettings) -> Result<(), ConfigError> {
    if settings.report_dir.is_empty() {
        return Err(ConfigError::Validation(
            "report_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
