//! App-level settings consumed by the modals in this crate.
//!
//! Settings are stored as JSON. They are validated once at start-up,
//! and a validation failure is returned to the caller instead of aborting.

use std::path::Path;

use makepad_widgets::{error, log};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{errors::ConfigurationError, utils};

/// The web client that users are sent to for features this app does not support yet.
pub const DEFAULT_WEB_APP_URL: &str = "https://app.element.io";

/// A full, English-language date, e.g. "Monday, October 19, 2026".
pub const DEFAULT_FULL_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// The width and height (in pixels) of room and space avatar thumbnails.
pub const DEFAULT_AVATAR_THUMBNAIL_SIZE: u32 = 40;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// The URL of the web client, shared in "feature unavailable" dialogs.
    pub web_app_url: String,
    /// The `chrono` format string used to display a room's creation date.
    pub full_date_format: String,
    /// The size of requested avatar thumbnails.
    pub avatar_thumbnail_size: u32,
}
impl Default for AppSettings {
    fn default() -> Self {
        Self {
            web_app_url: DEFAULT_WEB_APP_URL.to_owned(),
            full_date_format: DEFAULT_FULL_DATE_FORMAT.to_owned(),
            avatar_thumbnail_size: DEFAULT_AVATAR_THUMBNAIL_SIZE,
        }
    }
}

impl AppSettings {
    /// Parses and validates settings from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from the given JSON file.
    ///
    /// If the file doesn't exist, the default settings are returned.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log!("No settings file found at {}, using default settings.", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                error!("Failed to read settings from {}: {e}", path.display());
                return Err(ConfigurationError::from(e).into());
            }
        };
        match Self::from_json_str(&json) {
            Ok(settings) => {
                log!("Successfully loaded settings from {}.", path.display());
                Ok(settings)
            }
            Err(e) => {
                error!("Failed to load settings from {}: {e}", path.display());
                Err(e.into())
            }
        }
    }

    /// Checks that every setting is usable, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.web_app_url()?;
        validate_date_format(&self.full_date_format)?;
        if self.avatar_thumbnail_size == 0 {
            return Err(ConfigurationError::ZeroAvatarThumbnailSize);
        }
        Ok(())
    }

    /// Returns the parsed web app URL.
    pub fn web_app_url(&self) -> Result<Url, ConfigurationError> {
        let url = Url::parse(&self.web_app_url).map_err(|source| ConfigurationError::InvalidWebAppUrl {
            url: self.web_app_url.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigurationError::UnsupportedWebAppScheme(self.web_app_url.clone())),
        }
    }
}

/// Checks that `format` is a usable `chrono` format string.
pub fn validate_date_format(format: &str) -> Result<(), ConfigurationError> {
    if format.trim().is_empty() {
        return Err(ConfigurationError::EmptyDateFormat);
    }
    if !utils::is_valid_date_format(format) {
        return Err(ConfigurationError::InvalidDateFormat(format.to_owned()));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.web_app_url().unwrap().as_str(), "https://app.element.io/");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = AppSettings::from_json_str(r#"{ "web_app_url": "https://chat.example.org" }"#).unwrap();
        assert_eq!(settings.web_app_url, "https://chat.example.org");
        assert_eq!(settings.full_date_format, DEFAULT_FULL_DATE_FORMAT);
        assert_eq!(settings.avatar_thumbnail_size, DEFAULT_AVATAR_THUMBNAIL_SIZE);
    }

    #[test]
    fn malformed_web_app_url_is_rejected() {
        let err = AppSettings::from_json_str(r#"{ "web_app_url": "not a url" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidWebAppUrl { .. }));

        let err = AppSettings::from_json_str(r#"{ "web_app_url": "ftp://files.example.org" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedWebAppScheme(_)));
    }

    #[test]
    fn other_invalid_settings_are_rejected() {
        let err = AppSettings::from_json_str(r#"{ "full_date_format": "  " }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyDateFormat));

        let err = AppSettings::from_json_str(r#"{ "full_date_format": "%A %Q" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDateFormat(f) if f == "%A %Q"));

        let err = AppSettings::from_json_str(r#"{ "full_date_format": "%" }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDateFormat(_)));

        let err = AppSettings::from_json_str(r#"{ "avatar_thumbnail_size": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::ZeroAvatarThumbnailSize));

        let err = AppSettings::from_json_str("{ web_app_url ").unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedSettings(_)));
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let path = std::env::temp_dir().join("room_creation_modal_no_such_settings.json");
        let settings = AppSettings::load_from_file(&path).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn unreadable_settings_file_is_an_io_error() {
        // A directory exists but cannot be read as a file.
        let err = AppSettings::load_from_file(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ConfigurationError>(), Some(ConfigurationError::Io(_))));
    }
}
