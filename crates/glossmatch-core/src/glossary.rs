//! Glossary loading, validation, and fingerprinting.
//!
//! Sources are parsed into a raw [`serde_json::Value`] first (JSON directly,
//! TOML via its serde model), then [`validate`]d into a typed [`Glossary`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{GlossaryError, ValidationError, ValidationProblem};
use crate::model::{Glossary, GlossaryMeta, GlossarySignature, META_KEY};

/// Text format of a glossary source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlossaryFormat {
    Json,
    Toml,
}

impl GlossaryFormat {
    /// Pick a format from a file name; anything but `.toml` is treated as JSON.
    pub fn from_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => GlossaryFormat::Toml,
            _ => GlossaryFormat::Json,
        }
    }
}

/// Where to read a glossary from.
#[derive(Debug, Clone)]
pub enum GlossarySource {
    /// The store's configured default file.
    Default,
    /// An alternate file on disk.
    File(PathBuf),
    /// In-memory text, e.g. an uploaded file.
    Upload { name: String, content: String },
}

impl GlossarySource {
    /// Alternate sources replace the configured glossary and need privileges.
    pub fn is_alternate(&self) -> bool {
        !matches!(self, GlossarySource::Default)
    }
}

/// Access level granted by the [`AccessGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Standard,
    Privileged,
}

impl Access {
    pub fn is_privileged(self) -> bool {
        self == Access::Privileged
    }
}

/// Static shared-PIN gate for privileged mode.
///
/// This is a convenience lock, not authentication: anyone who knows the PIN
/// gets privileged access.
#[derive(Clone, Default)]
pub struct AccessGate {
    pin: Option<String>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("pin", &self.pin.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AccessGate {
    /// A gate that unlocks with `pin`. An empty PIN disables privileged mode.
    pub fn new(pin: Option<String>) -> Self {
        Self {
            pin: pin.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_some()
    }

    pub fn unlock(&self, attempt: Option<&str>) -> Access {
        match (&self.pin, attempt) {
            (Some(pin), Some(attempt)) if pin == attempt => Access::Privileged,
            (_, Some(_)) => {
                tracing::warn!("rejected privileged access attempt");
                Access::Standard
            }
            _ => Access::Standard,
        }
    }
}

/// Loads glossaries from the configured default or from alternate sources.
#[derive(Debug, Clone, Default)]
pub struct GlossaryStore {
    default_path: Option<PathBuf>,
}

impl GlossaryStore {
    pub fn new(default_path: Option<PathBuf>) -> Self {
        Self { default_path }
    }

    pub fn default_path(&self) -> Option<&Path> {
        self.default_path.as_deref()
    }

    /// Load and validate a glossary.
    ///
    /// Alternate sources are refused with [`GlossaryError::PermissionDenied`]
    /// unless `access` is privileged.
    pub fn load(&self, source: &GlossarySource, access: Access) -> Result<Glossary, GlossaryError> {
        if source.is_alternate() && !access.is_privileged() {
            tracing::warn!("refusing alternate glossary source without privileges");
            return Err(GlossaryError::PermissionDenied);
        }

        let glossary = match source {
            GlossarySource::Default => {
                let path = self.default_path.as_deref().ok_or_else(|| {
                    GlossaryError::NotFound("no default glossary is configured".into())
                })?;
                load_path(path)?
            }
            GlossarySource::File(path) => load_path(path)?,
            GlossarySource::Upload { name, content } => {
                parse_glossary_str(content, GlossaryFormat::from_name(name), name)?
            }
        };

        tracing::info!(
            terms = glossary.len(),
            signature = %glossary.signature().short(),
            "loaded glossary"
        );
        Ok(glossary)
    }
}

/// Read, parse, and validate a glossary file.
pub fn load_path(path: &Path) -> Result<Glossary, GlossaryError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GlossaryError::NotFound(path.display().to_string())
        } else {
            GlossaryError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let name = path.display().to_string();
    parse_glossary_str(&content, GlossaryFormat::from_name(&name), &name)
}

/// Parse and validate glossary text.
pub fn parse_glossary_str(
    content: &str,
    format: GlossaryFormat,
    source_name: &str,
) -> Result<Glossary, GlossaryError> {
    let raw = parse_raw(content, format, source_name)?;
    Ok(validate(&raw)?)
}

/// Parse glossary text into an untyped value without checking its shape.
pub fn parse_raw(
    content: &str,
    format: GlossaryFormat,
    source_name: &str,
) -> Result<Value, GlossaryError> {
    let parsed = match format {
        GlossaryFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        GlossaryFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| GlossaryError::Parse {
        source_name: source_name.to_string(),
        message,
    })
}

/// Check a raw value against the glossary rules and extract `_meta`.
pub fn validate(raw: &Value) -> Result<Glossary, ValidationError> {
    let Value::Object(map) = raw else {
        return Err(ValidationError::new(
            "<root>",
            ValidationProblem::NotAnObject {
                actual: type_name(raw),
            },
        ));
    };

    let mut entries = BTreeMap::new();
    let mut meta = GlossaryMeta::new();

    for (key, value) in map {
        if key == META_KEY {
            meta = validate_meta(value)?;
            continue;
        }
        if key.trim().is_empty() {
            return Err(ValidationError::new(key.clone(), ValidationProblem::EmptyKey));
        }
        let Value::String(explanation) = value else {
            return Err(ValidationError::new(
                key.clone(),
                ValidationProblem::WrongType {
                    expected: "a string",
                    actual: type_name(value),
                },
            ));
        };
        let explanation = explanation.trim();
        if explanation.is_empty() {
            return Err(ValidationError::new(
                key.clone(),
                ValidationProblem::EmptyExplanation,
            ));
        }
        entries.insert(key.clone(), explanation.to_string());
    }

    Glossary::assemble(entries, meta)
}

fn validate_meta(value: &Value) -> Result<GlossaryMeta, ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::new(
            META_KEY,
            ValidationProblem::WrongType {
                expected: "an object",
                actual: type_name(value),
            },
        ));
    };
    map.iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            other => Err(ValidationError::new(
                format!("{META_KEY}.{k}"),
                ValidationProblem::WrongType {
                    expected: "a string",
                    actual: type_name(other),
                },
            )),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// SHA-256 over the key-sorted JSON serialization of the entries.
pub fn signature(glossary: &Glossary) -> GlossarySignature {
    // BTreeMap serializes in key order, so insertion order never matters.
    let canonical =
        serde_json::to_vec(glossary.entry_map()).expect("string map serializes to JSON");
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    GlossarySignature::from_digest(hasher.finalize().into())
}
