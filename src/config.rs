//! Environment resolution for pos-cli
//!
//! A command talks to exactly one marketplace instance, described by an
//! [`Environment`]. Environments come from one of two places:
//! - a named entry in the settings file (`.marketplace-kit` in the working
//!   directory, or the path in `MARKETPLACE_KIT_PATH`)
//! - the `MARKETPLACE_URL`, `MARKETPLACE_TOKEN` and `MARKETPLACE_EMAIL`
//!   variables, when no name is given
//!
//! ## Environment Variable Expansion
//!
//! Values in the settings file support environment variable expansion:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use std::{env, fs, path::PathBuf};

use crate::constants::{
    MARKETPLACE_EMAIL_ENV, MARKETPLACE_TOKEN_ENV, MARKETPLACE_URL_ENV, SETTINGS_FILE,
    SETTINGS_PATH_ENV,
};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}")
        .expect("placeholder pattern is valid")
});

/// Connection details of one marketplace instance
///
/// Built once per command and handed to the gateway client, which owns it
/// for the rest of the process.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Base URL of the instance, always ending in `/`
    pub url: String,
    /// API token sent as `Authorization: Token <token>`
    #[serde(default)]
    pub token: String,
    /// Account email sent in the `From` header
    #[serde(default)]
    pub email: String,
}

impl Environment {
    pub fn new(url: impl Into<String>, token: impl Into<String>, email: impl Into<String>) -> Self {
        Environment {
            url: normalize_url(&url.into()),
            token: token.into(),
            email: email.into(),
        }
    }

    /// Read the environment from `MARKETPLACE_*` variables.
    ///
    /// Returns `None` when `MARKETPLACE_URL` is unset or empty; token and
    /// email default to empty strings.
    pub fn from_process_env() -> Option<Self> {
        let url = env::var(MARKETPLACE_URL_ENV).ok().filter(|u| !u.is_empty())?;
        Some(Environment::new(
            url,
            env::var(MARKETPLACE_TOKEN_ENV).unwrap_or_default(),
            env::var(MARKETPLACE_EMAIL_ENV).unwrap_or_default(),
        ))
    }
}

/// Contents of the settings file: environment name → connection details
///
/// # Example
///
/// ```json
/// {
///   "staging": {
///     "url": "https://staging.example.com/",
///     "token": "${STAGING_TOKEN}",
///     "email": "dev@example.com"
///   }
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct Settings {
    pub environments: BTreeMap<String, Environment>,
}

impl Settings {
    /// Look up a named environment.
    pub fn environment(&self, name: &str) -> anyhow::Result<Environment> {
        self.environments
            .get(name)
            .map(|e| Environment::new(e.url.clone(), e.token.clone(), e.email.clone()))
            .ok_or_else(|| {
                anyhow!(
                    "no settings for environment '{name}'. Add it with `pos-cli env add {name}`"
                )
            })
    }
}

/// Make sure the base URL ends with exactly one `/` so endpoint paths can be appended.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

pub fn settings_path() -> PathBuf {
    env::var(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(SETTINGS_FILE))
}

/// Load the settings file and expand `${VAR}` placeholders in every value.
///
/// A missing file is treated as an empty settings map.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    read_settings(path, true)
}

/// Load the settings file as written, placeholders untouched.
///
/// Used when the file is edited and saved back, so expanded secrets never
/// end up on disk.
pub fn load_settings_unexpanded(path: &Path) -> anyhow::Result<Settings> {
    read_settings(path, false)
}

fn read_settings(path: &Path, expand: bool) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    let mut settings: Settings = serde_json::from_str(&data)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    if expand {
        // Expanded after parsing, so values may hold any character.
        for env in settings.environments.values_mut() {
            env.url = expand_env_placeholders(&env.url);
            env.token = expand_env_placeholders(&env.token);
            env.email = expand_env_placeholders(&env.email);
        }
    }
    Ok(settings)
}

pub fn save_settings(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(settings)?;
    fs::write(path, data).with_context(|| format!("writing settings {}", path.display()))?;
    Ok(())
}

/// Resolve the environment a command should talk to.
///
/// With a name, the entry is taken from the settings file; without one,
/// from the `MARKETPLACE_*` variables.
pub fn resolve_environment(name: Option<&str>) -> anyhow::Result<Environment> {
    match name {
        Some(name) => load_settings(&settings_path())?.environment(name),
        None => Environment::from_process_env().ok_or_else(|| {
            anyhow!("no environment given and {MARKETPLACE_URL_ENV} is not set")
        }),
    }
}

pub fn expand_env_placeholders(input: &str) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let op = caps.get(2).map_or("", |m| m.as_str());
            let val = caps.get(3).map_or("", |m| m.as_str());
            let var = env::var(var_name).ok();

            match (var.as_deref(), op) {
                (Some(v), "") => v.to_string(),                      // ${VAR}
                (Some(v), ":-") if !v.is_empty() => v.to_string(),   // ${VAR:-default}
                (_, ":-") => val.to_string(),
                (Some(v), "-") => v.to_string(),                     // ${VAR-default}
                (None, "-") => val.to_string(),
                (Some(v), ":+") if !v.is_empty() => val.to_string(), // ${VAR:+alt}
                (Some(_), "+") => val.to_string(),                   // ${VAR+alt}
                _ => String::new(),
            }
        })
        .to_string()
}
