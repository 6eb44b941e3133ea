//! Gantry - build-output-to-manifest resolver
//!
//! Given the compiled artifacts a bundler produces for a set of declared
//! entry modules, Gantry computes a deterministic document describing, per
//! entry, which stylesheet, script, eager-preload and lazy-dynamic resources
//! a page must load, including paired legacy dual-build variants. A
//! lightweight dev-mode path bypasses the graph walk entirely when modules
//! are served unbundled.

pub mod bundler;
pub mod classify;
pub mod config;
pub mod dev;
pub mod entries;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod path_mapping;
pub mod paths;
pub mod resolver;

// Re-exports for convenience
pub use bundler::{AssetUnit, ChunkUnit, OutputPass, OutputUnit, PassKind, LEGACY_POLYFILLS_ID};
pub use classify::{
    classify, classify_stylesheet_modules, is_stylesheet_entry, recover_input_path,
    AssetDescriptor, CssDescriptor, FileDescriptor, JsDescriptor, StylesheetEntryKind,
};
pub use config::{BuildConfig, ExternalPatterns};
pub use dev::{
    dev_entry_points, dev_manifest, resolve_dev_server_origin, DevServerAddress, DevServerOptions,
};
pub use entries::{EntryRegistry, EntryType, LogicalEntry};
pub use error::{GantryError, GantryResult};
pub use hash::{HashAlgorithm, IntegrityHash};
pub use manifest::{
    FileMetadata, Manifest, ManifestAssembler, ResourceBundle, Version, MANIFEST_REL_PATH,
};
pub use path_mapping::PathMapper;
pub use resolver::{build_entry_points, resolve_entry_bundle, ExternalResolver};
