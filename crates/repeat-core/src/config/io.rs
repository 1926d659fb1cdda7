//! Reading and writing YAML config files
//!
//! Generic over the config type; the editor only uses [`EditorConfig`](super::EditorConfig).

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read `path` as YAML, falling back to `T::default()`
///
/// Never fails: a missing file is the normal first-run case, and an
/// unreadable or malformed one is reported and ignored.
pub fn load_config<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("load_config: no file at {:?}, using built-in settings", path);
            return T::default();
        }
        Err(e) => {
            log::warn!("load_config: cannot read {:?} ({}), using built-in settings", path, e);
            return T::default();
        }
    };

    serde_yaml::from_str(&text).unwrap_or_else(|e| {
        log::warn!("load_config: {:?} is not valid config ({}), using built-in settings", path, e);
        T::default()
    })
}

pub fn save_config<T: Serialize>(config: &T, path: &Path) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(config).context("serializing config")?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    }
    std::fs::write(path, yaml).with_context(|| format!("writing {:?}", path))?;
    log::info!("save_config: wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: EditorConfig = load_config(Path::new("/nonexistent/re-peat/config.yaml"));
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = EditorConfig {
            zoom_rate: 0.001,
            marker_limit: 12,
            ..EditorConfig::default()
        };
        save_config(&config, &path).unwrap();
        let loaded: EditorConfig = load_config(&path);

        assert_eq!(loaded.zoom_rate, 0.001);
        assert_eq!(loaded.marker_limit, 12);
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "zoom_rate: [not, a, number").unwrap();
        let loaded: EditorConfig = load_config(&path);
        assert_eq!(loaded, EditorConfig::default());
    }

    #[test]
    fn test_unreadable_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: EditorConfig = load_config(dir.path());
        assert_eq!(loaded, EditorConfig::default(), "a directory is not a config file");
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "pan_rate: 0.5\nkeybindings:\n  play_pause: [\"p\"]\n").unwrap();
        let loaded: EditorConfig = load_config(&path);
        assert_eq!(loaded.pan_rate, 0.5);
        assert_eq!(loaded.max_levels, 5);
        assert_eq!(loaded.keybindings.play_pause, vec!["p".to_string()]);
        assert_eq!(loaded.keybindings.cancel_edit, vec!["Escape".to_string()]);
    }
}
