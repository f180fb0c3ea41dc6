//! Runtime configuration.
//!
//! Read from a JSON file; every field has a default, so a partial file or no
//! file at all is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extensions::GlVersion;
use crate::sample::SampleKind;
use crate::shader::StageRetention;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// The OpenGL context to request. The samples use legacy GLSL and ARB
/// programs, so the profile is always a compatibility one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub major: u8,
    pub minor: u8,
    pub depth_bits: u8,
}

impl ContextConfig {
    pub fn version(&self) -> GlVersion {
        GlVersion::new(self.major as u32, self.minor as u32)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            depth_bits: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub window: WindowConfig,
    pub context: ContextConfig,
    /// Root directory holding one subdirectory of shaders and textures per sample.
    pub asset_dir: PathBuf,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// Overrides each sample's own stage retention policy.
    pub stage_retention: Option<StageRetention>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            context: ContextConfig::default(),
            asset_dir: PathBuf::from("assets"),
            log_level: "info".to_string(),
            stage_retention: None,
        }
    }
}

impl SampleConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, falling back to the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// `<config dir>/glsamples/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glsamples").join("config.json"))
    }

    pub fn sample_dir(&self, sample: SampleKind) -> PathBuf {
        self.asset_dir.join(sample.asset_subdir())
    }

    pub fn retention_for(&self, sample: SampleKind) -> StageRetention {
        self.stage_retention.unwrap_or_else(|| sample.default_retention())
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
