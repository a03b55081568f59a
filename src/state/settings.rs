/// Compression settings shared by every image
///
/// The application owns one `CompressionSettings` and copies it into each
/// compression request when the request is dispatched. Changing a slider
/// therefore only affects images compressed afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable pointing at an alternative settings file
pub const SETTINGS_ENV: &str = "IMAGE_COMPRESSOR_SETTINGS";

/// Output encodings offered in the format picker
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// All formats, in picker order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Webp];

    /// Extension used for downloaded files (`jpeg`, not `jpg`)
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Whether the encoder honours the quality setting
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::Webp)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings read at the moment a compression is dispatched
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CompressionSettings {
    /// Quality percentage (0 to 100)
    pub quality: u8,
    /// Maximum output width in pixels (None = unbounded)
    pub max_width: Option<u32>,
    /// Maximum output height in pixels (None = unbounded)
    pub max_height: Option<u32>,
    /// Output encoding
    pub format: OutputFormat,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 80,
            max_width: Some(1920),
            max_height: Some(1080),
            format: OutputFormat::Jpeg,
        }
    }
}

impl CompressionSettings {
    /// Quality as a fraction in [0, 1]
    pub fn quality_fraction(&self) -> f32 {
        f32::from(self.quality.min(100)) / 100.0
    }

    /// Parse a max-dimension text input; empty or non-numeric means unbounded
    pub fn parse_dimension(input: &str) -> Option<u32> {
        input.trim().parse().ok()
    }

    /// Load initial settings from the settings file, falling back to defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific JSON file
    ///
    /// A missing file is not an error. A malformed one is logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                debug!("No settings file at {} ({})", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                info!("⚙️  Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.quality = settings.quality.min(100);
        Ok(settings)
    }

    /// `$IMAGE_COMPRESSOR_SETTINGS`, else `<config dir>/image-compressor/settings.json`
    fn settings_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()?;
        path.push("image-compressor");
        path.push("settings.json");
        Some(path)
    }
}
