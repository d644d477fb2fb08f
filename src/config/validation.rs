use crate::config::types::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetch pipeline configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.per_attempt_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "per_attempt_timeout_ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate client name: non-empty, alphanumeric + hyphens only
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client_name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the content source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if config.candidates_path.is_empty() {
        return Err(ConfigError::Validation(
            "candidates_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.graph_path.is_empty() {
        return Err(ConfigError::Validation(
            "graph_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
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

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fetch_config() {
        assert!(validate_fetch_config(&FetchConfig::default()).is_ok());

        let zero_concurrency = FetchConfig {
            max_concurrency: 0,
            ..FetchConfig::default()
        };
        assert!(validate_fetch_config(&zero_concurrency).is_err());

        let too_many = FetchConfig {
            max_concurrency: 101,
            ..FetchConfig::default()
        };
        assert!(validate_fetch_config(&too_many).is_err());

        let zero_attempts = FetchConfig {
            max_attempts: 0,
            ..FetchConfig::default()
        };
        assert!(validate_fetch_config(&zero_attempts).is_err());

        let zero_timeout = FetchConfig {
            per_attempt_timeout_ms: 0,
            ..FetchConfig::default()
        };
        assert!(validate_fetch_config(&zero_timeout).is_err());

        // A zero retry delay is allowed
        let no_delay = FetchConfig {
            retry_delay_ms: 0,
            ..FetchConfig::default()
        };
        assert!(validate_fetch_config(&no_delay).is_ok());
    }

    #[test]
    fn test_validate_source_config() {
        let valid = SourceConfig {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            candidates_path: "list.txt".to_string(),
        };
        assert!(validate_source_config(&valid).is_ok());

        let bad_scheme = SourceConfig {
            api_url: "ftp://example.com/api".to_string(),
            ..valid.clone()
        };
        assert!(matches!(
            validate_source_config(&bad_scheme),
            Err(ConfigError::InvalidUrl(_))
        ));

        let no_path = SourceConfig {
            candidates_path: String::new(),
            ..valid
        };
        assert!(validate_source_config(&no_path).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }
}
