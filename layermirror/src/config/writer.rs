//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let address = config.control.address.as_deref().unwrap_or("");

    format!(
        r#"[control]
; Control endpoint of the remote authoring tool, e.g. tcp://127.0.0.1:5560
; The --control command line option takes precedence
address = {}
; Reply timeout in milliseconds for connect, ping and disconnect (default: 2500)
handshake_timeout_ms = {}
; Attempts per control request before the remote tool is considered offline (default: 3)
max_retries = {}

[store]
; Directory layer files and the root document are written to (default: tmp_scene)
directory = {}

[render]
; Idle time in milliseconds between frames while layers are loaded (default: 1000)
interval_ms = {}

[logging]
; Log file, cleared at the start of every session
file = {}
"#,
        address,
        config.control.handshake_timeout_ms,
        config.control.max_retries,
        path_to_string(&config.store.directory),
        config.render.interval_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.control.address = Some("tcp://192.168.1.20:5560".to_string());
        config.control.max_retries = 7;
        config.store.directory = PathBuf::from("/srv/scene");
        config.render.interval_ms = 250;

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_written_file_is_commented() {
        let text = ConfigFile::default().to_config_string();

        assert!(text.starts_with("[control]\n"));
        assert!(text.contains("\naddress = \n"));
        assert!(text.contains("\ndirectory = tmp_scene\n"));
    }
}
