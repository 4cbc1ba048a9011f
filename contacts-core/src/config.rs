//! Contacts configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, File, FileFormat};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATE_FORMATS, IMMUTABLE_KEY};
use crate::error::{ContactsError, ContactsResult};
use crate::parse::DateParser;

fn default_immutable_key() -> String {
    IMMUTABLE_KEY.to_string()
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Configuration at ~/.config/contacts/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContactsConfig {
    /// Directory suffix, e.g. "dc=example,dc=com"
    #[serde(default)]
    pub base_dn: String,

    /// Attribute left out of every change-set
    #[serde(default = "default_immutable_key")]
    pub immutable_key: String,

    /// Accepted birthday formats, tried in order
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    /// IANA zone used for "now" and for dates without a zone
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        ContactsConfig {
            base_dn: String::new(),
            immutable_key: default_immutable_key(),
            date_formats: default_date_formats(),
            timezone: default_timezone(),
        }
    }
}

impl ContactsConfig {
    pub fn config_path() -> ContactsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ContactsError::Config("Could not determine config directory".into()))?
            .join("contacts");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location; a missing file yields the defaults.
    pub fn load() -> ContactsResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> ContactsResult<Self> {
        let config: ContactsConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .map_err(|e| ContactsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ContactsError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Loaded contacts config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ContactsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ContactsError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ContactsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Parser over the configured formats.
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.date_formats.iter().cloned())
    }

    pub fn tz(&self) -> ContactsResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ContactsError::UnknownTimezone(self.timezone.clone()))
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> ContactsResult<DateTime<Tz>> {
        Ok(Utc::now().with_timezone(&self.tz()?))
    }
}
