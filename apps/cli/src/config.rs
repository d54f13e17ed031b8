//! Layered configuration.
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - `formcheck.toml` in the working directory, or the file given with `--config`
//! - `FORMCHECK_*` environment variables (`__` separates nested keys,
//!   e.g. `FORMCHECK_OUTPUT__JOINER`)
//! - command-line flags

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use formcheck_validator::MessageCatalog;
use serde::{Deserialize, Serialize};

/// Configuration file picked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "formcheck.toml";

/// Prefix of the environment variables merged into the configuration.
pub const ENV_PREFIX: &str = "FORMCHECK_";

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logging settings
    pub logging: LoggingSettings,
    /// Report settings
    pub output: OutputSettings,
    /// Message template overrides keyed by rule code
    pub messages: BTreeMap<String, String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when neither `FORMCHECK_LOG` nor `RUST_LOG` is set
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly
    Pretty,
    /// Single line per event
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Report format
    pub format: ReportFormat,
    /// Separator between the messages of one field in text reports
    pub joiner: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            joiner: "; ".to_owned(),
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per field
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl Settings {
    /// Loads defaults, the configuration file and the environment.
    ///
    /// An explicit `path` must exist. The default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()));

        let figment = match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("configuration file {} does not exist", path.display());
                }
                figment.merge(Toml::file(path))
            }
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        // `FORMCHECK_LOG` is the log filter and `FORMCHECK_CONFIG` the file path.
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["log", "config"]));

        figment.extract().context("invalid configuration")
    }

    /// Message catalog with the configured overrides applied to the defaults.
    pub fn catalog(&self) -> MessageCatalog {
        let mut catalog = MessageCatalog::default();
        catalog.extend(self.messages.iter().map(|(code, text)| (code.clone(), text.clone())));
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.output.format, ReportFormat::Text);
        assert_eq!(settings.output.joiner, "; ");
        assert!(settings.messages.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[output]
format = "json"

[messages]
required = "Missing"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.output.format, ReportFormat::Json);
        assert_eq!(settings.output.joiner, "; ");
        assert_eq!(settings.messages.get("required").map(String::as_str), Some("Missing"));
        assert_eq!(settings.catalog().get("required"), Some("Missing"));
        assert_eq!(settings.catalog().get("email"), Some("Please enter a valid email"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"xml\"").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }
}
