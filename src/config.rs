//! Configuration file handling.
//!
//! The configuration file is a small JSON document naming the two transaction sources and the
//! display settings of the analyses. By default it lives at `$HOME/.expenses/config.json`.

use crate::analysis::{DEFAULT_THRESHOLD, DEFAULT_TOP_N, OTHER_LABEL};
use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::load::Location;
use crate::utils;
use anyhow::{ensure, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;

/// The `Config` object represents the loaded configuration file. Relative source paths in the
/// file are resolved against the directory that holds the file.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    config_file: ConfigFile,
    invoice: Location,
    statement: Location,
}

impl Config {
    /// Writes an initial configuration file at `path` that points at the given sources, creating
    /// the parent directory if needed.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or the locations are empty.
    pub async fn create(path: impl Into<PathBuf>, invoice: &str, statement: &str) -> Result<Self> {
        let path = path.into();
        async {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                utils::make_dir(parent).await?;
            }
            let config_file = ConfigFile {
                invoice: invoice.to_string(),
                statement: statement.to_string(),
                ..ConfigFile::default()
            };
            config_file.validate()?;
            config_file.save(&path).await?;
            Self::from_file(path.clone(), config_file)
        }
        .await
        .context("Unable to create the configuration")
        .pub_result(ErrorType::Config)
    }

    /// Loads and validates the configuration file at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        async {
            if !path.is_file() {
                anyhow::bail!("The config file is missing '{}'", path.display());
            }
            let config_file = ConfigFile::load(&path).await?;
            debug!("Loaded config from {}", path.display());
            Self::from_file(path.clone(), config_file)
        }
        .await
        .pub_result(ErrorType::Config)
    }

    /// Writes the settings back to the file this config was loaded from.
    pub async fn save(&self) -> Result<()> {
        self.config_file
            .save(&self.path)
            .await
            .pub_result(ErrorType::Config)
    }

    /// Changes how many categories the ranked lists hold.
    pub fn set_top_n(&mut self, top_n: usize) {
        self.config_file.top_n = top_n;
    }

    fn from_file(path: PathBuf, config_file: ConfigFile) -> Res<Self> {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let invoice = resolve(&base, &config_file.invoice);
        let statement = resolve(&base, &config_file.statement);
        Ok(Self {
            path,
            config_file,
            invoice,
            statement,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn invoice(&self) -> &Location {
        &self.invoice
    }

    pub fn statement(&self) -> &Location {
        &self.statement
    }

    pub fn top_n(&self) -> usize {
        self.config_file.top_n
    }

    pub fn other_threshold(&self) -> Decimal {
        self.config_file.other_threshold
    }

    pub fn other_label(&self) -> &str {
        &self.config_file.other_label
    }
}

/// Parses `raw` as a location and, if it is a relative path, joins it onto `base`.
fn resolve(base: &Path, raw: &str) -> Location {
    // Parsing a location cannot fail
    let location: Location = match raw.parse() {
        Ok(location) => location,
        Err(never) => match never {},
    };
    match location {
        Location::Path(p) if p.is_relative() => Location::Path(base.join(p)),
        other => other,
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "invoice": "https://example.com/historico_fatura.csv",
///   "statement": "data/extrato.csv",
///   "top_n": 5,
///   "other_threshold": "0.01",
///   "other_label": "Outros"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Location of the card invoice data, a path or an http(s) URL
    invoice: String,

    /// Location of the account statement data, a path or an http(s) URL
    statement: String,

    /// How many categories the ranked increase and reduction lists hold
    #[serde(default = "default_top_n")]
    top_n: usize,

    /// Categories with a smaller share of the period total than this are folded together
    #[serde(default = "default_other_threshold")]
    other_threshold: Decimal,

    /// The label of the folded row
    #[serde(default = "default_other_label")]
    other_label: String,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_other_threshold() -> Decimal {
    DEFAULT_THRESHOLD
}

fn default_other_label() -> String {
    OTHER_LABEL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            invoice: String::new(),
            statement: String::new(),
            top_n: default_top_n(),
            other_threshold: default_other_threshold(),
            other_label: default_other_label(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or fails validation
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        config
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Res<()> {
        ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        ensure!(
            self.config_version == CONFIG_VERSION,
            "Unsupported config_version {}, expected {}",
            self.config_version,
            CONFIG_VERSION
        );
        ensure!(!self.invoice.trim().is_empty(), "The invoice location is empty");
        ensure!(
            !self.statement.trim().is_empty(),
            "The statement location is empty"
        );
        ensure!(self.top_n > 0, "top_n must be at least 1");
        ensure!(
            self.other_threshold >= Decimal::ZERO && self.other_threshold <= Decimal::ONE,
            "other_threshold must be a fraction between 0 and 1, got {}",
            self.other_threshold
        );
        ensure!(
            !self.other_label.trim().is_empty(),
            "other_label must not be empty"
        );
        Ok(())
    }
}
