//! Layered settings: command-line flag > environment > config file > default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use gametrack_github::{DEFAULT_BRANCH, DEFAULT_MESSAGE, DEFAULT_PATH, PublishTarget};
use gametrack_wikidata::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

use crate::cli_types::ExportArgs;
use crate::error::CliError;

pub(crate) const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub(crate) const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub(crate) const ENV_DATABASE: &str = "GAMETRACK_DATABASE";

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
    /// Passed on the command line.
    Flag(&'static str),
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "--{flag}"),
            Self::EnvVar(var) => write!(f, "env ${var}"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// A resolved value and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Setting<T> {
    pub value: Option<T>,
    pub source: SettingSource,
}

impl<T> Setting<T> {
    fn missing() -> Self {
        Self {
            value: None,
            source: SettingSource::Missing,
        }
    }
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub github: GitHubConfig,
    pub store: StoreConfig,
    pub wikidata: WikidataConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GitHubConfig {
    pub repository: Option<String>,
    pub token: Option<String>,
    pub branch: Option<String>,
    pub path: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StoreConfig {
    pub database: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WikidataConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
}

/// Every setting the commands use, fully resolved.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub database: Setting<PathBuf>,
    pub repository: Setting<String>,
    pub token: Setting<String>,
    pub branch: Setting<String>,
    pub path: Setting<String>,
    pub message: Setting<String>,
    pub wikidata_endpoint: Setting<String>,
    pub user_agent: Setting<String>,
}

/// Return the path to the config file.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gametrack-data").join("config.toml"))
}

/// Parse the config file. A missing file is an empty config.
pub(crate) fn load_config_file(path: &Path) -> Result<ConfigFile, CliError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&text).map_err(|e| CliError::config(format!("{}: {e}", path.display())))
}

fn flag<'a>(name: &'static str, value: &'a Option<String>) -> Option<(&'static str, &'a String)> {
    value.as_ref().filter(|v| !v.is_empty()).map(|v| (name, v))
}

/// Pick the first layer that has a non-empty value.
fn layered<T: Clone>(
    flag: Option<(&'static str, &T)>,
    env: Option<(&'static str, T)>,
    file: Option<&T>,
    default: Option<T>,
) -> Setting<T> {
    if let Some((name, value)) = flag {
        return Setting {
            value: Some(value.clone()),
            source: SettingSource::Flag(name),
        };
    }
    if let Some((var, value)) = env {
        return Setting {
            value: Some(value),
            source: SettingSource::EnvVar(var),
        };
    }
    if let Some(value) = file {
        return Setting {
            value: Some(value.clone()),
            source: SettingSource::ConfigFile,
        };
    }
    match default {
        Some(value) => Setting {
            value: Some(value),
            source: SettingSource::Default,
        },
        None => Setting::missing(),
    }
}

impl Settings {
    /// Resolve every setting. `env` looks up an environment variable;
    /// empty values count as unset.
    pub(crate) fn resolve(
        args: &ExportArgs,
        env: impl Fn(&str) -> Option<String>,
        file: &ConfigFile,
    ) -> Self {
        let env = |var: &'static str| env(var).filter(|v| !v.is_empty()).map(|v| (var, v));

        Self {
            database: layered(
                args.database.as_ref().map(|p| ("database", p)),
                env(ENV_DATABASE).map(|(var, v)| (var, PathBuf::from(v))),
                file.store.database.as_ref(),
                gametrack_db::default_database_path(),
            ),
            repository: layered(
                flag("gh-repo", &args.gh_repo),
                env(ENV_REPOSITORY),
                file.github.repository.as_ref(),
                None,
            ),
            token: layered(
                flag("gh-token", &args.gh_token),
                env(ENV_TOKEN),
                file.github.token.as_ref(),
                None,
            ),
            branch: layered(
                flag("branch", &args.branch),
                None,
                file.github.branch.as_ref(),
                Some(DEFAULT_BRANCH.to_string()),
            ),
            path: layered(
                flag("path", &args.path),
                None,
                file.github.path.as_ref(),
                Some(DEFAULT_PATH.to_string()),
            ),
            message: layered(
                flag("message", &args.message),
                None,
                file.github.message.as_ref(),
                Some(DEFAULT_MESSAGE.to_string()),
            ),
            wikidata_endpoint: layered(
                None,
                None,
                file.wikidata.endpoint.as_ref(),
                Some(DEFAULT_ENDPOINT.to_string()),
            ),
            user_agent: layered(
                None,
                None,
                file.wikidata.user_agent.as_ref(),
                Some(DEFAULT_USER_AGENT.to_string()),
            ),
        }
    }

    /// Resolve against the real environment and config file.
    pub(crate) fn load(args: &ExportArgs) -> Result<Self, CliError> {
        let file = match config_path() {
            Some(path) => load_config_file(&path)?,
            None => ConfigFile::default(),
        };
        Ok(Self::resolve(args, |var| std::env::var(var).ok(), &file))
    }

    /// Repository and token, when both are set.
    pub(crate) fn github_credentials(&self) -> Option<(&str, &str)> {
        match (&self.repository.value, &self.token.value) {
            (Some(repo), Some(token)) => Some((repo.as_str(), token.as_str())),
            _ => None,
        }
    }

    pub(crate) fn publish_target(&self) -> PublishTarget {
        let value = |s: &Setting<String>, default: &str| {
            s.value.clone().unwrap_or_else(|| default.to_string())
        };
        PublishTarget {
            branch: value(&self.branch, DEFAULT_BRANCH),
            path: value(&self.path, DEFAULT_PATH),
            message: value(&self.message, DEFAULT_MESSAGE),
        }
    }
}
