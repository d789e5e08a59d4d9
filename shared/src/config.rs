//! Shell-supplied configuration: where share links point, the share sheet
//! copy, and the directory of local emergency numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::capabilities::{DialError, DialNumber};
use crate::catalog::{default_directory, EmergencyContact};

pub const DEFAULT_MAP_BASE_URL: &str = "https://maps.google.com/";
pub const DEFAULT_SHARE_TITLE: &str = "My Current Location - Emergency";
pub const DEFAULT_SHARE_TEXT: &str = "I need assistance. Here is my current location:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("map base url {url:?} is invalid: {reason}")]
    InvalidMapUrl { url: String, reason: String },

    #[error("directory entry {service:?} has an invalid number: {source}")]
    InvalidDirectoryNumber {
        service: String,
        #[source]
        source: DialError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SosConfig {
    pub map_base_url: String,
    pub share_title: String,
    pub share_text: String,
    pub directory: Vec<EmergencyContact>,
}

impl Default for SosConfig {
    fn default() -> Self {
        Self {
            map_base_url: DEFAULT_MAP_BASE_URL.to_string(),
            share_title: DEFAULT_SHARE_TITLE.to_string(),
            share_text: DEFAULT_SHARE_TEXT.to_string(),
            directory: default_directory(),
        }
    }
}

impl SosConfig {
    /// Parses and validates. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map_base()?;
        for contact in &self.directory {
            DialNumber::new(&contact.number).map_err(|source| {
                ConfigError::InvalidDirectoryNumber {
                    service: contact.service.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    pub fn map_base(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMapUrl {
            url: self.map_base_url.clone(),
            reason,
        };

        let url = Url::parse(&self.map_base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("not a base url".into()));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SosConfig::default();
        config.validate().unwrap();
        assert_eq!(config.directory.len(), 12);
        assert_eq!(config.map_base().unwrap().host_str(), Some("maps.google.com"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            SosConfig::from_json(r#"{"map_base_url":"https://www.openstreetmap.org/search"}"#)
                .unwrap();
        assert_eq!(config.map_base_url, "https://www.openstreetmap.org/search");
        assert_eq!(config.share_title, DEFAULT_SHARE_TITLE);
        assert_eq!(config.directory, default_directory());
    }

    #[test]
    fn custom_directory_replaces_default() {
        let config = SosConfig::from_json(
            r#"{"directory":[{"service":"EU Emergency","number":"112","description":"All services"}]}"#,
        )
        .unwrap();
        assert_eq!(config.directory.len(), 1);
        assert_eq!(config.directory[0].number, "112");
    }

    #[test]
    fn rejects_non_http_map_url() {
        let err = SosConfig::from_json(r#"{"map_base_url":"javascript:alert(1)"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMapUrl { .. }));

        let err = SosConfig::from_json(r#"{"map_base_url":"not a url"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMapUrl { .. }));
    }

    #[test]
    fn rejects_bad_directory_number() {
        let err = SosConfig::from_json(
            r#"{"directory":[{"service":"Broken","number":"call-me","description":""}]}"#,
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidDirectoryNumber { service, source } => {
                assert_eq!(service, "Broken");
                assert_eq!(source, DialError::InvalidCharacter('c'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SosConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
