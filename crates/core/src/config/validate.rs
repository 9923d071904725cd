use super::{Config, ConfigError};

/// Cross-field validation run after loading, before anything is wired up.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.site.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Invalid("site.base_url must be set".to_string()));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "site.base_url must be an http(s) URL, got {base_url:?}"
        )));
    }

    if config.site.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "site.timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.ingest.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "ingest.poll_interval_ms must be greater than zero".to_string(),
        ));
    }

    if config.download.dir.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "download.dir must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::load_config_from_str;
    use super::*;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[site]
base_url = "https://listing.example.org"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let mut config = valid_config();
        config.site.base_url = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = valid_config();
        config.site.base_url = "ftp://listing.example.org".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let mut config = valid_config();
        config.ingest.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
