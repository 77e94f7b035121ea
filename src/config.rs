use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Settings for `gitlab-groups`
#[derive(Deserialize, Debug, Clone)]
pub struct ExplorerConfig {
    pub gitlab_url: Url,
    pub private_token: String,
    pub group_path: String,
}

/// Settings for `sonar-link`
#[derive(Deserialize, Debug, Clone)]
pub struct LinkerConfig {
    pub sonar_url: String,
    pub sonar_token: String,
}

impl ExplorerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_yaml(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.gitlab_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::InvalidConfig(format!(
                    "gitlab_url must be an http(s) URL, got scheme {other:?}"
                )))
            }
        }
        require_non_empty("private_token", &self.private_token)?;
        require_non_empty("group_path", &self.group_path)
    }
}

impl LinkerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_yaml(path.as_ref())?;
        require_non_empty("sonar_url", &config.sonar_url)?;
        require_non_empty("sonar_token", &config.sonar_token)?;
        Ok(config)
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
        path: PathBuf::from(path),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| Error::ConfigYaml {
        path: PathBuf::from(path),
        source,
    })
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::InvalidConfig(format!("{key} must not be empty")))
    } else {
        Ok(())
    }
}
