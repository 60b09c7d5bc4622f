use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fxcalc::SessionConfig;
use serde::Deserialize;

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
}

/// Load config from disk. Returns defaults if no config file exists.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(&content).with_context(|| format!("parsing {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// `~/.config/fxcalc/config.toml`
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("fxcalc")
            .join("config.toml"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxcalc::AngleMode;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.session.angle_mode, AngleMode::Degrees);
    }

    #[test]
    fn test_angle_mode_from_file() {
        let config = parse_config("[session]\nangle_mode = \"radians\"\n").unwrap();
        assert_eq!(config.session.angle_mode, AngleMode::Radians);
    }

    #[test]
    fn test_bad_angle_mode_is_rejected() {
        assert!(parse_config("[session]\nangle_mode = \"gradians\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/fxcalc.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
