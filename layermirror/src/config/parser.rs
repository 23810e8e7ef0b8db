//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [control] section
    if let Some(section) = ini.section(Some("control")) {
        if let Some(v) = section.get("address") {
            let v = v.trim();
            if !v.is_empty() {
                config.control.address = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("handshake_timeout_ms") {
            config.control.handshake_timeout_ms = parse_positive(v).ok_or_else(|| {
                ConfigFileError::InvalidValue {
                    section: "control".to_string(),
                    key: "handshake_timeout_ms".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (milliseconds)".to_string(),
                }
            })?;
        }
        if let Some(v) = section.get("max_retries") {
            config.control.max_retries = parse_positive(v)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "control".to_string(),
                    key: "max_retries".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
    }

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.store.directory = expand_tilde(v);
            }
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("interval_ms") {
            config.render.interval_ms =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "render".to_string(),
                    key: "interval_ms".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (milliseconds)".to_string(),
                })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[control]
address = tcp://127.0.0.1:5560
"#,
        )
        .unwrap();

        assert_eq!(
            config.control.address.as_deref(),
            Some("tcp://127.0.0.1:5560")
        );
        assert_eq!(config.control.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.render.interval_ms, DEFAULT_RENDER_INTERVAL_MS);
    }

    #[test]
    fn test_empty_address_stays_unset() {
        let config = load(
            r#"
[control]
address =
"#,
        )
        .unwrap();

        assert!(config.control.address.is_none());
    }

    #[test]
    fn test_all_sections() {
        let config = load(
            r#"
[control]
address = tcp://10.0.0.2:5560
handshake_timeout_ms = 500
max_retries = 5

[store]
directory = /var/tmp/scene

[render]
interval_ms = 0

[logging]
file = /var/log/layermirror.log
"#,
        )
        .unwrap();

        assert_eq!(config.control.handshake_timeout_ms, 500);
        assert_eq!(config.control.max_retries, 5);
        assert_eq!(config.store.directory, PathBuf::from("/var/tmp/scene"));
        assert_eq!(config.render.interval_ms, 0);
        assert_eq!(
            config.logging.file,
            PathBuf::from("/var/log/layermirror.log")
        );
    }

    #[test]
    fn test_zero_retries_rejected() {
        let err = load(
            r#"
[control]
max_retries = 0
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("control.max_retries"));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let err = load(
            r#"
[control]
handshake_timeout_ms = soon
"#,
        )
        .unwrap_err();

        match err {
            ConfigFileError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "handshake_timeout_ms");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let result = load(
            r#"
[render]
interval_ms = -1
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
