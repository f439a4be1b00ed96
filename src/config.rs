use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::AccordionPolicy;

pub const CONFIG_FILE: &str = "t262view.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where results and releases are fetched from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the published result store (the directory holding `info.json` and `refs/`).
    pub results_base_url: String,
    /// GitHub `owner/name` of the engine repository.
    pub org_repo: String,
    pub api_host: String,
    /// Prefix for links to individual test files.
    pub test_source_base_url: String,
    /// Branch shown in the main region.
    pub branch: String,
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            results_base_url: "https://boajs.dev/test262".into(),
            org_repo: "boa-dev/boa".into(),
            api_host: "https://api.github.com".into(),
            test_source_base_url: "https://github.com/tc39/test262/blob/main".into(),
            branch: "master".into(),
            request_timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/releases",
            self.api_host.trim_end_matches('/'),
            self.org_repo
        )
    }

    pub fn commit_url(&self, commit: &str) -> String {
        format!("https://github.com/{}/commit/{}", self.org_repo, commit)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Keep at most one suite open per level of the results tree.
    pub accordion_per_level: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            accordion_per_level: AccordionPolicy::default().per_level,
        }
    }
}

impl ViewConfig {
    pub fn accordion(&self) -> AccordionPolicy {
        AccordionPolicy {
            per_level: self.accordion_per_level,
        }
    }
}

/// Overrides the program used to open test sources.
#[derive(Debug, Default, Deserialize)]
pub struct BrowserConfig {
    /// Command line, split like a shell would. The URL is appended.
    /// Example: "firefox --new-tab"
    pub command: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file. Logging stays off when neither this nor `T262VIEW_LOG` is set.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".into(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if absent or invalid.
    ///
    /// A file that exists but cannot be used is handed back alongside the
    /// defaults so the caller can report it once logging is up.
    pub fn load(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::read(path) {
            Ok(config) => (config, None),
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                (Self::default(), None)
            }
            Err(err) => (Self::default(), Some(err)),
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
