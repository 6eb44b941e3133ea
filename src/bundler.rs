//! Bundler collaborator types
//!
//! One build produces one or more output passes (a modern pass, optionally a
//! legacy pass targeting older runtimes). Each pass is a flat list of raw
//! output units tagged `asset` or `chunk`; the classifier turns these into
//! typed descriptors. The shapes here mirror what bundlers report per
//! rendered unit and deserialize from the pass files the driver ingests.

use serde::{Deserialize, Serialize};

/// Reserved virtual module id for the shared legacy polyfills chunk.
///
/// Bundlers mark virtual modules with a NUL prefix; the mapper stores the
/// stripped form.
pub const LEGACY_POLYFILLS_ID: &str = "\u{0}virtual:legacy-polyfills";

/// Which build variant a pass belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    Modern,
    Legacy,
}

/// One completed bundler output pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPass {
    pub kind: PassKind,
    pub units: Vec<OutputUnit>,
}

/// A raw output unit as reported by the bundler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputUnit {
    Asset(AssetUnit),
    Chunk(ChunkUnit),
}

impl OutputUnit {
    pub fn file_name(&self) -> &str {
        match self {
            OutputUnit::Asset(asset) => &asset.file_name,
            OutputUnit::Chunk(chunk) => &chunk.file_name,
        }
    }
}

/// An emitted static file (stylesheet, image, font, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUnit {
    pub file_name: String,
    /// Raw content, hashed when integrity is enabled
    #[serde(default)]
    pub source: String,
}

impl AssetUnit {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

/// A compiled script chunk containing one or more source modules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkUnit {
    pub file_name: String,
    /// Bundler-assigned chunk name (entry name or derived)
    pub name: String,
    #[serde(default)]
    pub is_entry: bool,
    /// Originating module id, absent for bundler-synthesized chunks
    #[serde(default)]
    pub facade_module_id: Option<String>,
    /// Ids of every source module folded into this chunk
    #[serde(default)]
    pub modules: Vec<String>,
    /// Output paths of directly imported chunks
    #[serde(default)]
    pub imports: Vec<String>,
    /// Output paths of dynamic-import targets
    #[serde(default)]
    pub dynamic_imports: Vec<String>,
    /// Compiled stylesheets associated with this chunk
    #[serde(default)]
    pub imported_css: Vec<String>,
    /// Static assets associated with this chunk
    #[serde(default)]
    pub imported_assets: Vec<String>,
    /// Compiled text, hashed when integrity is enabled
    #[serde(default)]
    pub code: String,
}

impl ChunkUnit {
    pub fn new(file_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            name: name.into(),
            is_entry: false,
            facade_module_id: None,
            modules: Vec::new(),
            imports: Vec::new(),
            dynamic_imports: Vec::new(),
            imported_css: Vec::new(),
            imported_assets: Vec::new(),
            code: String::new(),
        }
    }

    pub fn entry(mut self) -> Self {
        self.is_entry = true;
        self
    }

    pub fn with_facade(mut self, facade: impl Into<String>) -> Self {
        self.facade_module_id = Some(facade.into());
        self
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dynamic_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_css<I, S>(mut self, css: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imported_css = css.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imported_assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}
