//! Build configuration.
//!
//! [`BuildConfig`] carries the options of a single build. [`ConfigFile`] is
//! the persistent INI file (`~/.config/metsdnx/config.ini` on Linux) that
//! supplies defaults; command-line flags take precedence over it.
//!
//! ```ini
//! [build]
//! structmap_type = BOTH
//! digital_original = true
//! fixity = MD5
//!
//! [logging]
//! level = info
//! file = /var/log/metsdnx.log
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{BuildError, BuildResult};
use crate::fixity::FixityAlgorithm;
use crate::representation::StructMapType;

/// Default log level when neither the config file nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Options for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root that file locations are made relative to.
    pub input_dir: Option<PathBuf>,
    pub structmap_type: StructMapType,
    /// Rendered as `DigitalOriginal` in every representation block.
    pub digital_original: bool,
    /// Algorithm used when a checksum has to be computed.
    pub fixity_algorithm: FixityAlgorithm,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(input_dir.into());
        self
    }

    pub fn with_structmap_type(mut self, structmap_type: StructMapType) -> Self {
        self.structmap_type = structmap_type;
        self
    }

    pub fn with_digital_original(mut self, digital_original: bool) -> Self {
        self.digital_original = digital_original;
        self
    }

    pub fn with_fixity_algorithm(mut self, algorithm: FixityAlgorithm) -> Self {
        self.fixity_algorithm = algorithm;
        self
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSettings {
    pub structmap_type: Option<StructMapType>,
    pub digital_original: Option<bool>,
    pub fixity: Option<FixityAlgorithm>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Contents of the INI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub build: BuildSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> BuildResult<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> BuildResult<Self> {
        let ini = Ini::load_from_file(path)
            .map_err(|e| BuildError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ini(&ini)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> BuildResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| BuildError::Config(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> BuildResult<Self> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("build")) {
            config.build.structmap_type = section
                .get("structmap_type")
                .map(StructMapType::parse_lenient);
            config.build.digital_original = section
                .get("digital_original")
                .map(|v| parse_bool("build.digital_original", v))
                .transpose()?;
            config.build.fixity = section
                .get("fixity")
                .map(|v| {
                    FixityAlgorithm::from_tag(v).ok_or_else(|| {
                        BuildError::Config(format!("build.fixity: unknown algorithm '{}'", v))
                    })
                })
                .transpose()?;
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = section.get("level") {
                config.logging.level = level.trim().to_string();
            }
            config.logging.file = section
                .get("file")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from);
        }

        Ok(config)
    }

    /// Fill a build configuration from the `[build]` section.
    pub fn apply(&self, mut config: BuildConfig) -> BuildConfig {
        if let Some(structmap_type) = self.build.structmap_type {
            config.structmap_type = structmap_type;
        }
        if let Some(digital_original) = self.build.digital_original {
            config.digital_original = digital_original;
        }
        if let Some(fixity) = self.build.fixity {
            config.fixity_algorithm = fixity;
        }
        config
    }
}

fn parse_bool(key: &str, value: &str) -> BuildResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(BuildError::Config(format!(
            "{}: expected a boolean, got '{}'",
            key, other
        ))),
    }
}

/// Default configuration file path.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("metsdnx")
        .join("config.ini")
}
