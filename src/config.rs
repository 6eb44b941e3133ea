//! Build configuration
//!
//! Loaded from a `gantry.toml` by the driver, or constructed directly by
//! embedders. Validation happens at load time, before any output pass is
//! ingested: entries must be a name-keyed table, the base must name a
//! subdirectory, and the integrity algorithm must be one we support.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::error::{GantryError, GantryResult};
use crate::hash::HashAlgorithm;
use crate::resolver::ExternalResolver;

/// Configuration for one build invocation
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root every source path is expressed relative to
    pub root: PathBuf,
    /// Public URL prefix applied to every emitted resource path, `/{dir}/`
    pub base: String,
    /// Build output root, relative to `root` unless absolute
    pub out_dir: PathBuf,
    /// Declared entries, in declaration order: name -> source path
    pub entries: IndexMap<String, String>,
    /// Integrity digest algorithm; `None` disables hashing
    pub sri_algorithm: Option<HashAlgorithm>,
    /// Imports resolved outside the bundle
    pub external: ExternalPatterns,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base: "/build/".to_string(),
            out_dir: PathBuf::from("public/build"),
            entries: IndexMap::new(),
            sri_algorithm: None,
            external: ExternalPatterns::default(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> GantryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse configuration from TOML text
    pub fn parse(text: &str) -> GantryResult<Self> {
        let raw: ConfigFile = toml::from_str(text)?;

        let entries = match raw.entries {
            EntriesField::Named(entries) => entries,
            EntriesField::Positional(_) => return Err(GantryError::PositionalEntries),
        };

        let base = match raw.base {
            Some(base) => normalize_base(&base)?,
            None => "/build/".to_string(),
        };

        let sri_algorithm = match raw.sri_algorithm {
            Some(name) => Some(HashAlgorithm::from_str(&name)?),
            None => None,
        };

        let external = ExternalPatterns::new(raw.external, &raw.external_patterns)?;

        Ok(Self {
            root: raw.root.unwrap_or_else(|| PathBuf::from(".")),
            base,
            out_dir: raw.out_dir.unwrap_or_else(|| PathBuf::from("public/build")),
            entries,
            sri_algorithm,
            external,
        })
    }

    pub fn with_entry(mut self, name: impl Into<String>, input: impl Into<String>) -> Self {
        self.entries.insert(name.into(), input.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_sri_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.sri_algorithm = Some(algorithm);
        self
    }
}

/// Normalize a base to `/{dir}/` form. An empty directory is a
/// configuration error: the base must name a subdirectory.
fn normalize_base(base: &str) -> GantryResult<String> {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(GantryError::InvalidConfig {
            message: "base must be a subdirectory, e.g. \"/build/\"".to_string(),
        });
    }
    Ok(format!("/{trimmed}/"))
}

/// Raw TOML shape, before validation
#[derive(Debug, Deserialize)]
struct ConfigFile {
    root: Option<PathBuf>,
    base: Option<String>,
    out_dir: Option<PathBuf>,
    #[serde(default)]
    entries: EntriesField,
    sri_algorithm: Option<String>,
    #[serde(default)]
    external: Vec<String>,
    #[serde(default)]
    external_patterns: Vec<String>,
}

/// Entries as written in the config file. The positional form is accepted by
/// the deserializer only so it can be rejected with a pointed error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntriesField {
    Named(IndexMap<String, String>),
    Positional(Vec<String>),
}

impl Default for EntriesField {
    fn default() -> Self {
        EntriesField::Named(IndexMap::new())
    }
}

/// Stock external-import matcher: exact ids plus regex patterns.
///
/// Mirrors the two declarative forms build configs use; embedders needing
/// importer-sensitive logic implement [`ExternalResolver`] directly.
#[derive(Debug, Clone, Default)]
pub struct ExternalPatterns {
    ids: Vec<String>,
    patterns: Vec<Regex>,
}

impl ExternalPatterns {
    pub fn new(ids: Vec<String>, patterns: &[String]) -> GantryResult<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| GantryError::InvalidConfig {
                    message: format!("invalid external pattern '{pattern}': {err}"),
                })
            })
            .collect::<GantryResult<Vec<_>>>()?;
        Ok(Self { ids, patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.patterns.is_empty()
    }
}

impl ExternalResolver for ExternalPatterns {
    fn is_external(&self, id: &str, _importer: &str) -> bool {
        self.ids.iter().any(|ext| ext == id) || self.patterns.iter().any(|re| re.is_match(id))
    }
}
