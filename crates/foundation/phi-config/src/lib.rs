//! # phi-config
//!
//! Loads and saves `KernelConfig` from JSON or YAML files.
//!
//! The format is picked from the file extension (`.json`, `.yaml`, `.yml`).
//! The default location is `<config dir>/phi-kernel/config.yaml`.

use phi_kernel::KernelConfig;
use std::path::{Path, PathBuf};

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid config value: {0}")]
    Invalid(#[from] phi_kernel::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Default config file location
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phi-kernel")
        .join("config.yaml")
}

/// Parse config text in the given format and validate it
fn parse(text: &str, format: Format) -> Result<KernelConfig> {
    let config: KernelConfig = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file
pub fn load(path: &Path) -> Result<KernelConfig> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse(&text, format)?;
    tracing::info!(
        "Loaded kernel config from {}: scale={}, max_bins={}",
        path.display(),
        config.spiral_scale,
        config.max_bins
    );
    Ok(config)
}

/// Load from `path` (or the default path), falling back to defaults when the file does not exist
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: Option<&Path>) -> Result<KernelConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(KernelConfig::default());
    }
    load(&path)
}

/// Validate and write a config file, creating parent directories
pub fn save(path: &Path, config: &KernelConfig) -> Result<()> {
    config.validate()?;
    let text = match Format::from_path(path)? {
        Format::Json => serde_json::to_string_pretty(config)?,
        Format::Yaml => serde_yaml::to_string(config)?,
    };

    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)?;

    tracing::info!("Saved kernel config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "spiral_scale: 2.5\nmax_bins: 64\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.spiral_scale, 2.5);
        assert_eq!(config.max_bins, 64);
        assert_eq!(config.fibonacci_prefetch, 32);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fibonacci_prefetch": 10}"#).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.fibonacci_prefetch, 10);
        assert_eq!(config.spiral_scale, 1.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = KernelConfig {
            spiral_scale: 0.25,
            max_bins: 100,
            fibonacci_prefetch: 5,
        };

        for name in ["nested/config.yml", "nested/config.json"] {
            let path = dir.path().join(name);
            save(&path, &config).unwrap();
            assert_eq!(load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "spiral_scale: -3.0\n").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            save(&path, &KernelConfig { max_bins: 0, ..Default::default() }),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("bad.json");
        std::fs::write(&json, "{ not json").unwrap();
        assert!(matches!(load(&json), Err(ConfigError::Json(_))));

        let toml = dir.path().join("config.toml");
        std::fs::write(&toml, "spiral_scale = 1.0").unwrap();
        assert!(matches!(load(&toml), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert_eq!(load_or_default(Some(&path)).unwrap(), KernelConfig::default());

        assert!(matches!(
            load(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_default_path_shape() {
        let path = default_path();
        assert!(path.ends_with("phi-kernel/config.yaml"));
    }
}
