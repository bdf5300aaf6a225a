use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_ZENHUB_URL: &str = "https://api.zenhub.io";

/// Shape of the token file, shown to the user when a token is missing.
pub const CONFIG_EXAMPLE: &str = "[token]\ngithub = \"xxx...\"\nzenhub = \"yyy...\"";

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    token: TokenSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TokenSection {
    #[serde(default)]
    github: String,
    #[serde(default)]
    zenhub: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub zenhub_token: String,
    pub github_url: String,
    pub zenhub_url: String,
    pub path: PathBuf,
}

impl Config {
    /// `$HOME/.config/peekabow/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = env::var("HOME")
            .map_err(|_| Error::Config("HOME environment variable not set".to_string()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("peekabow")
            .join("config.toml"))
    }

    /// Loads the token file (a missing file counts as empty), applies
    /// environment overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_toml(&contents, path)?
            .with_overrides(|key| env::var(key).ok())
            .validated()
    }

    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;

        Ok(Self {
            github_token: file.token.github,
            zenhub_token: file.token.zenhub,
            github_url: DEFAULT_GITHUB_URL.to_string(),
            zenhub_url: DEFAULT_ZENHUB_URL.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Non-empty values returned by `lookup` win over the file.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.github_token = token;
        }
        if let Some(token) = lookup("ZENHUB_TOKEN") {
            self.zenhub_token = token;
        }
        if let Some(url) = lookup("PEEKABOW_GITHUB_URL") {
            self.github_url = url;
        }
        if let Some(url) = lookup("PEEKABOW_ZENHUB_URL") {
            self.zenhub_url = url;
        }

        self
    }

    pub fn validated(self) -> Result<Self> {
        if self.github_token.is_empty() || self.zenhub_token.is_empty() {
            return Err(Error::MissingToken { path: self.path });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Issue lookups allowed in flight at once; 1 keeps the strict
    /// one-at-a-time handoff.
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            show_progress: false,
        }
    }
}
