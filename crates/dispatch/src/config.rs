use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which source answers queries for names without a virtual cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    /// Virtual cells first, then the platform's hardware service.
    Hardware,
    /// Virtual cells only.
    Touch,
}

/// Target platform, used to pick the input method when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Desktop,
    Console,
    Mobile,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn default_method(self) -> InputMethod {
        match self {
            Self::Desktop | Self::Console => InputMethod::Hardware,
            Self::Mobile => InputMethod::Touch,
        }
    }
}

/// Errors from loading an input configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Process-start input configuration.
///
/// ```yaml
/// active_method: touch   # optional
/// platform: desktop      # optional, defaults to the compile target
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub active_method: Option<InputMethod>,
    pub platform: Option<Platform>,
}

impl InputConfig {
    pub fn with_method(method: InputMethod) -> Self {
        Self {
            active_method: Some(method),
            platform: None,
        }
    }

    /// The configured method, or the platform's default.
    pub fn resolved_method(&self) -> InputMethod {
        self.active_method.unwrap_or_else(|| {
            self.platform
                .unwrap_or_else(Platform::current)
                .default_method()
        })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
