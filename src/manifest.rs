//! Manifest document and multi-pass assembler
//!
//! The assembler accumulates classified descriptors across output passes and
//! emits the final document only once the number of completed passes reaches
//! the number of declared output targets. Legacy pairing needs descriptors
//! from both the modern and legacy passes present at once, so assembling
//! earlier is an error, never a partial document.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::bundler::{OutputPass, OutputUnit};
use crate::classify::{classify, is_stylesheet_entry, recover_input_path, FileDescriptor};
use crate::config::BuildConfig;
use crate::entries::EntryRegistry;
use crate::error::{GantryError, GantryResult};
use crate::hash::{HashAlgorithm, IntegrityHash};
use crate::path_mapping::PathMapper;
use crate::paths::project_relative;
use crate::resolver::{build_entry_points, ExternalResolver};

/// Where the manifest lands under the build output root
pub const MANIFEST_REL_PATH: &str = ".gantry/entrypoints.json";

/// Per-entry resource lists, ordered by first discovery and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceBundle {
    pub css: Vec<String>,
    pub dynamic: Vec<String>,
    pub js: Vec<String>,
    /// Sibling legacy entry name; serializes as `false` when absent
    #[serde(serialize_with = "serialize_legacy_ref")]
    pub legacy: Option<String>,
    pub preload: Vec<String>,
}

fn serialize_legacy_ref<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(name) => serializer.serialize_str(name),
        None => serializer.serialize_bool(false),
    }
}

/// Integrity metadata for one emitted file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    pub hash: Option<IntegrityHash>,
}

/// Version quadruple serialized as `[raw, major, minor, patch]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub raw: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a version string, tolerating pre-release suffixes and missing
    /// components (`"1.2"` parses as 1.2.0, `"1.2.3-dev"` as 1.2.3).
    pub fn parse(raw: &str) -> Self {
        let numbers: Vec<u64> = raw.split('.').take(3).map(leading_number).collect();
        Self {
            raw: raw.to_string(),
            major: numbers.first().copied().unwrap_or(0),
            minor: numbers.get(1).copied().unwrap_or(0),
            patch: numbers.get(2).copied().unwrap_or(0),
        }
    }

    /// This crate's own version
    pub fn current() -> Self {
        Self::parse(env!("CARGO_PKG_VERSION"))
    }
}

fn leading_number(component: &str) -> u64 {
    let digits: String = component
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.raw)?;
        seq.serialize_element(&self.major)?;
        seq.serialize_element(&self.minor)?;
        seq.serialize_element(&self.patch)?;
        seq.end()
    }
}

/// The final document describing what each page entry must load
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub base: String,
    pub entry_points: IndexMap<String, ResourceBundle>,
    pub legacy: bool,
    pub metadatas: IndexMap<String, FileMetadata>,
    pub version: Version,
    pub dev_server_origin: Option<String>,
}

/// Accumulates descriptors across output passes, then assembles the manifest.
///
/// Built fresh per build invocation; the mapper and descriptor map die with
/// it, so repeated builds in a long-lived process never leak state.
#[derive(Debug)]
pub struct ManifestAssembler {
    root: PathBuf,
    base: String,
    sri_algorithm: Option<HashAlgorithm>,
    mapper: PathMapper,
    files: IndexMap<String, FileDescriptor>,
    passes_seen: usize,
    expected_passes: usize,
}

impl ManifestAssembler {
    pub fn new(config: &BuildConfig, expected_passes: usize) -> Self {
        Self {
            root: config.root.clone(),
            base: config.base.clone(),
            sri_algorithm: config.sri_algorithm,
            mapper: PathMapper::new(),
            files: IndexMap::new(),
            passes_seen: 0,
            expected_passes,
        }
    }

    /// Ingest one completed bundler pass.
    ///
    /// Pure stylesheet entries feed the mapper first: their source has to
    /// map to the compiled stylesheet, a link the bundler itself omits, so
    /// the stylesheet asset classified below can recover its identity. The
    /// wrapper chunk contributes nothing beyond that mapping.
    pub fn ingest_pass(&mut self, pass: &OutputPass) {
        for unit in &pass.units {
            if let OutputUnit::Chunk(chunk) = unit {
                if is_stylesheet_entry(chunk) {
                    let source = match &chunk.facade_module_id {
                        Some(facade) => project_relative(&self.root, facade),
                        None => chunk.name.clone(),
                    };
                    for stylesheet in &chunk.imported_css {
                        self.mapper.record(source.clone(), stylesheet.clone());
                    }
                }
            }
        }

        for unit in &pass.units {
            if let OutputUnit::Chunk(chunk) = unit {
                if is_stylesheet_entry(chunk) {
                    continue;
                }
            }
            let input = recover_input_path(unit, pass.kind, &self.root, &self.mapper);
            self.mapper.record(input.clone(), unit.file_name());
            let descriptor = classify(unit, &input, self.sri_algorithm);
            self.files.insert(unit.file_name().to_string(), descriptor);
        }

        self.passes_seen += 1;
    }

    pub fn passes_seen(&self) -> usize {
        self.passes_seen
    }

    /// True once every declared output pass has been ingested
    pub fn is_complete(&self) -> bool {
        self.passes_seen >= self.expected_passes
    }

    /// Assemble the final manifest. Fails while passes are outstanding (the
    /// document is withheld, never emitted partially) and on any resolution
    /// error.
    pub fn assemble(
        &self,
        registry: &EntryRegistry,
        external: &dyn ExternalResolver,
    ) -> GantryResult<Manifest> {
        if !self.is_complete() {
            return Err(GantryError::IncompletePasses {
                seen: self.passes_seen,
                expected: self.expected_passes,
            });
        }

        let entry_points =
            build_entry_points(registry, &self.mapper, &self.files, external, &self.base)?;
        let legacy = entry_points.contains_key("polyfills-legacy");

        Ok(Manifest {
            base: self.base.clone(),
            entry_points,
            legacy,
            metadatas: self.metadatas(),
            version: Version::current(),
            dev_server_origin: None,
        })
    }

    fn metadatas(&self) -> IndexMap<String, FileMetadata> {
        self.files
            .iter()
            .filter_map(|(output, descriptor)| {
                descriptor.hash().map(|hash| {
                    (
                        format!("{}{output}", self.base),
                        FileMetadata {
                            hash: Some(hash.clone()),
                        },
                    )
                })
            })
            .collect()
    }
}
