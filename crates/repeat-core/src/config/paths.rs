//! Default locations for configuration files

use std::path::PathBuf;

/// Returns `~/.config/re-peat`, or `./re-peat` without a home directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("re-peat")
}

/// Returns `~/.config/re-peat/config.yaml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_app_name() {
        assert!(default_config_dir().ends_with("re-peat"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        assert!(default_config_path().ends_with("re-peat/config.yaml"));
    }
}
