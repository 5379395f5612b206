//! glossmatch configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use glossmatch_core::DEFAULT_QUESTION_COUNT;

/// Top-level glossmatch configuration.
///
/// Note: Custom Debug impl masks the admin PIN to keep it out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct GlossmatchConfig {
    /// Default glossary file, relative to the working directory.
    #[serde(default)]
    pub glossary: Option<PathBuf>,
    /// Questions per round.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Shared PIN that unlocks privileged mode. `${VAR}` references are
    /// resolved from the environment.
    #[serde(default)]
    pub admin_pin: Option<String>,
}

impl std::fmt::Debug for GlossmatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlossmatchConfig")
            .field("glossary", &self.glossary)
            .field("question_count", &self.question_count)
            .field("admin_pin", &self.admin_pin.as_ref().map(|_| "***"))
            .finish()
    }
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

impl Default for GlossmatchConfig {
    fn default() -> Self {
        Self {
            glossary: None,
            question_count: default_question_count(),
            admin_pin: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `glossmatch.toml` in the current directory
/// 2. `~/.config/glossmatch/config.toml`
///
/// `GLOSSMATCH_ADMIN_PIN` overrides the configured PIN.
pub fn load_config_from(path: Option<&Path>) -> Result<GlossmatchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("glossmatch.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<GlossmatchConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => GlossmatchConfig::default(),
    };

    config.admin_pin = match std::env::var("GLOSSMATCH_ADMIN_PIN") {
        Ok(pin) => Some(pin),
        Err(_) => config.admin_pin.as_deref().map(resolve_env_vars),
    }
    .filter(|p| !p.is_empty());

    anyhow::ensure!(
        config.question_count >= 1,
        "question_count must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("glossmatch"))
}
