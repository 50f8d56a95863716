//! User settings for Residual
//!
//! Theme, image host, and calculator defaults. Stored as pretty JSON in the
//! data directory and passed around explicitly once loaded.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use super::paths::ResidualPaths;
use crate::error::ResidualError;
use crate::models::Currency;
use crate::notify::StackAnchor;
use crate::services::valuation::DEFAULT_HIGH_VALUE_THRESHOLD;

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ResidualError::validation(format!(
                "Unknown theme '{}'; expected light or dark",
                other
            ))),
        }
    }
}

/// Supported image hosting services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImageHostKind {
    #[default]
    LskyPro,
    EasyImages,
}

impl FromStr for ImageHostKind {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lskypro" | "lsky" => Ok(Self::LskyPro),
            "easyimages" | "easyimage" => Ok(Self::EasyImages),
            other => Err(ResidualError::validation(format!(
                "Unsupported image host '{}'; expected LskyPro or EasyImages",
                other
            ))),
        }
    }
}

/// How an uploaded image link is copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CopyFormat {
    #[default]
    Markdown,
    Url,
}

impl FromStr for CopyFormat {
    type Err = ResidualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "url" => Ok(Self::Url),
            other => Err(ResidualError::validation(format!(
                "Unknown copy format '{}'; expected markdown or url",
                other
            ))),
        }
    }
}

pub const DEFAULT_IMAGE_HOST_URL: &str = "https://image.dooo.ng";

/// Image host connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHostSettings {
    #[serde(default)]
    pub kind: ImageHostKind,
    #[serde(default = "default_image_host_url")]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub copy_format: CopyFormat,
}

fn default_image_host_url() -> String {
    DEFAULT_IMAGE_HOST_URL.to_string()
}

impl Default for ImageHostSettings {
    fn default() -> Self {
        Self {
            kind: ImageHostKind::default(),
            url: default_image_host_url(),
            token: String::new(),
            copy_format: CopyFormat::default(),
        }
    }
}

impl ImageHostSettings {
    /// The URL must be non-empty and absolute `http` or `https`
    pub fn validate(&self) -> Result<(), ResidualError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ResidualError::validation("Image host URL must not be empty"));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ResidualError::validation(format!("Invalid image host URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ResidualError::validation(
                "Image host URL must start with http:// or https://",
            ));
        }

        Ok(())
    }
}

/// User settings for Residual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Version of the application that last wrote this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Saved theme; unset until first resolved from the system preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,

    #[serde(default)]
    pub image_host: ImageHostSettings,

    /// Currency preselected in the calculator
    #[serde(default)]
    pub default_currency: Currency,

    /// Remaining values at or above this are celebrated
    #[serde(default = "default_threshold")]
    pub high_value_threshold: f64,

    /// Default toast display time
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,

    /// Corner the toast stack grows from
    #[serde(default)]
    pub toast_anchor: StackAnchor,

    /// Base URL prefixed to share links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_base_url: Option<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_HIGH_VALUE_THRESHOLD
}

fn default_notification_duration_ms() -> u64 {
    3000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_version: None,
            theme: None,
            image_host: ImageHostSettings::default(),
            default_currency: Currency::default(),
            high_value_threshold: default_threshold(),
            notification_duration_ms: default_notification_duration_ms(),
            toast_anchor: StackAnchor::default(),
            share_base_url: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if the file doesn't exist
    pub fn load_or_create(paths: &ResidualPaths) -> Result<Self, ResidualError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = fs::read_to_string(&settings_path).map_err(|e| {
                ResidualError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ResidualError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ResidualPaths) -> Result<(), ResidualError> {
        paths.ensure_directories()?;

        let path = paths.settings_file();
        let temp_path = path.with_extension("json.tmp");

        // Write to temp file, then rename over the old one
        let file = File::create(&temp_path)
            .map_err(|e| ResidualError::Io(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| {
            ResidualError::Config(format!("Failed to serialize settings: {}", e))
        })?;
        writer
            .flush()
            .and_then(|_| writer.get_ref().sync_all())
            .map_err(|e| ResidualError::Io(format!("Failed to write settings file: {}", e)))?;

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ResidualError::Io(format!("Failed to replace settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reset stored state when the running version differs from the stored one
    ///
    /// Theme and image host survive the reset. Returns `true` when anything
    /// changed; the caller is responsible for saving.
    pub fn reconcile_version(&mut self, running_version: &str) -> bool {
        if self.app_version.as_deref() == Some(running_version) {
            return false;
        }

        info!(
            stored = self.app_version.as_deref().unwrap_or("none"),
            running = running_version,
            "settings version changed, resetting"
        );

        *self = Settings {
            app_version: Some(running_version.to_string()),
            theme: self.theme,
            image_host: std::mem::take(&mut self.image_host),
            ..Settings::default()
        };
        true
    }

    /// The effective theme
    ///
    /// A saved theme wins. Otherwise the system preference is adopted and
    /// stored; the second value reports whether settings changed.
    pub fn resolve_theme(&mut self, prefers_dark: bool) -> (Theme, bool) {
        match self.theme {
            Some(theme) => (theme, false),
            None => {
                let theme = if prefers_dark { Theme::Dark } else { Theme::Light };
                self.theme = Some(theme);
                (theme, true)
            }
        }
    }

    /// Flip between light and dark, returning the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.unwrap_or_default().toggled();
        self.theme = Some(theme);
        theme
    }

    pub fn reset_image_host(&mut self) {
        self.image_host = ImageHostSettings::default();
    }
}

/// Guess whether the terminal prefers a dark scheme
///
/// Reads `COLORFGBG` ("fg;bg"), where a background of 0-6 or 8 is dark.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next()?.parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, None);
        assert_eq!(settings.high_value_threshold, 1000.0);
        assert_eq!(settings.notification_duration_ms, 3000);
        assert_eq!(settings.image_host.kind, ImageHostKind::LskyPro);
        assert_eq!(settings.image_host.url, "https://image.dooo.ng");
        assert!(settings.image_host.token.is_empty());
        assert_eq!(settings.image_host.copy_format, CopyFormat::Markdown);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ResidualPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.theme = Some(Theme::Dark);
        settings.default_currency = Currency::Jpy;
        settings.share_base_url = Some("https://calc.example/".into());
        settings.toast_anchor = StackAnchor::TopRight;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ResidualPaths::with_base_dir(temp_dir.path().join("fresh"));
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ResidualPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ResidualError::Config(_)));
    }

    #[test]
    fn test_version_change_keeps_theme_and_image_host() {
        let mut settings = Settings {
            app_version: Some("0.1.0".into()),
            theme: Some(Theme::Dark),
            default_currency: Currency::Gbp,
            high_value_threshold: 50.0,
            ..Settings::default()
        };
        settings.image_host.token = "secret".into();

        assert!(settings.reconcile_version("0.2.0"));
        assert_eq!(settings.app_version.as_deref(), Some("0.2.0"));
        assert_eq!(settings.theme, Some(Theme::Dark));
        assert_eq!(settings.image_host.token, "secret");
        assert_eq!(settings.default_currency, Currency::Usd);
        assert_eq!(settings.high_value_threshold, 1000.0);

        assert!(!settings.reconcile_version("0.2.0"));
    }

    #[test]
    fn test_resolve_theme_adopts_system_preference_once() {
        let mut settings = Settings::default();
        assert_eq!(settings.resolve_theme(true), (Theme::Dark, true));
        // Saved preference now wins over the system
        assert_eq!(settings.resolve_theme(false), (Theme::Dark, false));

        let mut light = Settings::default();
        assert_eq!(light.resolve_theme(false), (Theme::Light, true));
    }

    #[test]
    fn test_toggle_theme() {
        let mut settings = Settings::default();
        assert_eq!(settings.toggle_theme(), Theme::Dark);
        assert_eq!(settings.toggle_theme(), Theme::Light);
        assert_eq!(settings.theme, Some(Theme::Light));
    }

    #[test]
    fn test_image_host_validation() {
        let mut host = ImageHostSettings::default();
        assert!(host.validate().is_ok());

        host.url = "ftp://files.example".into();
        assert!(host.validate().unwrap_err().is_validation());

        host.url = "   ".into();
        assert!(host.validate().unwrap_err().is_validation());

        host.url = "image.example".into();
        assert!(host.validate().is_err());
    }

    #[test]
    fn test_reset_image_host() {
        let mut settings = Settings::default();
        settings.image_host.kind = ImageHostKind::EasyImages;
        settings.image_host.url = "https://img.example".into();
        settings.reset_image_host();
        assert_eq!(settings.image_host, ImageHostSettings::default());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(
            "EasyImages".parse::<ImageHostKind>().unwrap(),
            ImageHostKind::EasyImages
        );
        assert_eq!("URL".parse::<CopyFormat>().unwrap(), CopyFormat::Url);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
