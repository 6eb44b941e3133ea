//! File classifier
//!
//! Turns one raw bundler output unit into a typed [`FileDescriptor`], and
//! recovers the logical source identity bundlers omit for stylesheet and
//! asset outputs. Descriptors are keyed by output path in the descriptor
//! map; the graph resolver walks them.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bundler::{ChunkUnit, OutputUnit, PassKind, LEGACY_POLYFILLS_ID};
use crate::hash::{HashAlgorithm, IntegrityHash};
use crate::path_mapping::PathMapper;
use crate::paths::{legacy_name, project_relative, strip_nul};

static CSS_LANGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(css|less|sass|scss|styl|stylus|pcss|postcss|sss)($|\?)").unwrap());
static CSS_MODULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.module\.(css|less|sass|scss|styl|stylus|pcss|postcss|sss)($|\?)").unwrap()
});
static COMMONJS_PROXY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?commonjs-proxy").unwrap());

/// True when a module id names a stylesheet-language request
pub(crate) fn is_css_request(id: &str) -> bool {
    CSS_LANGS_RE.is_match(id)
}

/// Typed descriptor for one compiled output unit.
///
/// `output_path` is the unique key into the descriptor map for one build
/// pass. Only `js` descriptors carry graph edges.
#[derive(Debug, Clone, PartialEq)]
pub enum FileDescriptor {
    Css(CssDescriptor),
    Asset(AssetDescriptor),
    Js(JsDescriptor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssDescriptor {
    pub input_path: String,
    pub output_path: String,
    pub hash: Option<IntegrityHash>,
    /// Stylesheet outputs this descriptor contributes (its own file)
    pub css: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    pub input_path: String,
    pub output_path: String,
    pub hash: Option<IntegrityHash>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsDescriptor {
    pub input_path: String,
    pub output_path: String,
    pub hash: Option<IntegrityHash>,
    /// Output paths of directly imported chunks
    pub imports: Vec<String>,
    /// Own script outputs (the compiled chunk itself)
    pub js: Vec<String>,
    /// Eager script dependencies; populated during resolution merges
    pub preload: Vec<String>,
    /// Lazily fetched dynamic-import targets
    pub dynamic: Vec<String>,
    /// Transitively associated stylesheet outputs
    pub css: Vec<String>,
    /// Transitively associated static-asset outputs
    pub assets: Vec<String>,
}

impl FileDescriptor {
    pub fn output_path(&self) -> &str {
        match self {
            FileDescriptor::Css(css) => &css.output_path,
            FileDescriptor::Asset(asset) => &asset.output_path,
            FileDescriptor::Js(js) => &js.output_path,
        }
    }

    pub fn input_path(&self) -> &str {
        match self {
            FileDescriptor::Css(css) => &css.input_path,
            FileDescriptor::Asset(asset) => &asset.input_path,
            FileDescriptor::Js(js) => &js.input_path,
        }
    }

    pub fn hash(&self) -> Option<&IntegrityHash> {
        match self {
            FileDescriptor::Css(css) => css.hash.as_ref(),
            FileDescriptor::Asset(asset) => asset.hash.as_ref(),
            FileDescriptor::Js(js) => js.hash.as_ref(),
        }
    }
}

/// Classify one raw output unit into a typed descriptor.
///
/// Asset units ending in `.css` become `css` descriptors; other assets stay
/// generic. Chunk units become `js` descriptors with their graph edges;
/// dynamic-import targets are kept in their own bucket, never merged into
/// the eager lists.
pub fn classify(
    unit: &OutputUnit,
    input_path: &str,
    algorithm: Option<HashAlgorithm>,
) -> FileDescriptor {
    match unit {
        OutputUnit::Asset(asset) => {
            let hash = algorithm.map(|alg| IntegrityHash::digest(alg, asset.source.as_bytes()));
            if asset.file_name.ends_with(".css") {
                FileDescriptor::Css(CssDescriptor {
                    input_path: input_path.to_string(),
                    output_path: asset.file_name.clone(),
                    hash,
                    css: vec![asset.file_name.clone()],
                })
            } else {
                FileDescriptor::Asset(AssetDescriptor {
                    input_path: input_path.to_string(),
                    output_path: asset.file_name.clone(),
                    hash,
                })
            }
        }
        OutputUnit::Chunk(chunk) => FileDescriptor::Js(JsDescriptor {
            input_path: input_path.to_string(),
            output_path: chunk.file_name.clone(),
            hash: algorithm.map(|alg| IntegrityHash::digest(alg, chunk.code.as_bytes())),
            imports: chunk.imports.clone(),
            js: vec![chunk.file_name.clone()],
            preload: Vec::new(),
            dynamic: chunk.dynamic_imports.clone(),
            css: chunk.imported_css.clone(),
            assets: chunk.imported_assets.clone(),
        }),
    }
}

/// How an entry chunk's module set relates to stylesheet languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylesheetEntryKind {
    /// Every module is a plain stylesheet-language file
    PureCss,
    /// Stylesheet and non-stylesheet modules side by side
    Mixed,
    /// No plain stylesheet module at all
    NonCss,
}

/// Classify a chunk's module ids. CSS-module variants and wrapped commonjs
/// proxies do not count as plain stylesheets.
pub fn classify_stylesheet_modules(module_ids: &[String]) -> StylesheetEntryKind {
    let mut stylesheets = 0usize;
    let mut others = 0usize;
    for id in module_ids {
        if is_css_request(id) && !CSS_MODULE_RE.is_match(id) && !COMMONJS_PROXY_RE.is_match(id) {
            stylesheets += 1;
        } else {
            others += 1;
        }
    }
    if others == 0 {
        StylesheetEntryKind::PureCss
    } else if stylesheets == 0 {
        StylesheetEntryKind::NonCss
    } else {
        StylesheetEntryKind::Mixed
    }
}

/// A chunk counts as a pure stylesheet entry only if it is a declared entry,
/// its modules classify as [`StylesheetEntryKind::PureCss`], and exactly one
/// distinct compiled stylesheet is associated with it. The detection is
/// heuristic: anything else falls back to generic chunk handling.
pub fn is_stylesheet_entry(chunk: &ChunkUnit) -> bool {
    if !chunk.is_entry {
        return false;
    }
    if classify_stylesheet_modules(&chunk.modules) != StylesheetEntryKind::PureCss {
        return false;
    }
    let distinct: HashSet<&str> = chunk.imported_css.iter().map(String::as_str).collect();
    distinct.len() == 1
}

/// Recover the logical source path naming a unit's descriptor.
///
/// Asset units (and chunks the bundler synthesized without an originating
/// module) consult the mapper; a placeholder name is synthesized when no
/// mapping exists. Chunks use their originating module's project-relative
/// path, with the legacy-suffix convention applied during the legacy pass so
/// pairing recognizes twins.
pub fn recover_input_path(
    unit: &OutputUnit,
    kind: PassKind,
    root: &Path,
    mapper: &PathMapper,
) -> String {
    let facade = match unit {
        OutputUnit::Chunk(chunk) => chunk.facade_module_id.as_deref(),
        OutputUnit::Asset(_) => None,
    };

    let Some(facade) = facade else {
        return match mapper.input(unit.file_name()) {
            Some(input) => input.to_string(),
            None => format!("_{}", unit.file_name()),
        };
    };

    if facade == LEGACY_POLYFILLS_ID {
        return strip_nul(facade);
    }

    let mut input = project_relative(root, facade);
    if let OutputUnit::Chunk(chunk) = unit {
        if kind == PassKind::Legacy && !chunk.name.contains("-legacy") {
            input = legacy_name(&input);
        }
    }
    strip_nul(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::AssetUnit;
    use std::path::PathBuf;

    const JS_CODE: &str = "export function greet(name) {\n  return `Hello ${name}`;\n}\n";

    fn root() -> PathBuf {
        PathBuf::from("/home/me/project-dir")
    }

    #[test]
    fn stylesheet_asset_classifies_as_css() {
        let unit = OutputUnit::Asset(AssetUnit::new("assets/index-aa7c.css", "body{}"));
        let descriptor = classify(&unit, "_assets/index-aa7c.css", None);
        match descriptor {
            FileDescriptor::Css(css) => {
                assert_eq!(css.output_path, "assets/index-aa7c.css");
                assert_eq!(css.css, vec!["assets/index-aa7c.css"]);
                assert!(css.hash.is_none());
            }
            other => panic!("expected css descriptor, got {other:?}"),
        }
    }

    #[test]
    fn generic_asset_classifies_as_asset() {
        let unit = OutputUnit::Asset(AssetUnit::new("assets/logo-d015.png", "png-bytes"));
        let descriptor = classify(&unit, "_assets/logo-d015.png", None);
        assert!(matches!(descriptor, FileDescriptor::Asset(_)));
        assert_eq!(descriptor.output_path(), "assets/logo-d015.png");
        assert_eq!(descriptor.input_path(), "_assets/logo-d015.png");
    }

    #[test]
    fn chunk_classifies_as_js_with_graph_edges() {
        let unit = OutputUnit::Chunk(
            ChunkUnit::new("assets/pageAssets-05cf.js", "pageAssets")
                .with_imports(["assets/vendor-9c21.js"])
                .with_dynamic_imports(["assets/modal-77aa.js"])
                .with_css(["assets/index-aa7c.css"])
                .with_assets(["assets/logo-d015.png"]),
        );
        let descriptor = classify(&unit, "assets/page/assets/index.js", None);
        match descriptor {
            FileDescriptor::Js(js) => {
                assert_eq!(js.js, vec!["assets/pageAssets-05cf.js"]);
                assert_eq!(js.imports, vec!["assets/vendor-9c21.js"]);
                assert_eq!(js.dynamic, vec!["assets/modal-77aa.js"]);
                assert_eq!(js.css, vec!["assets/index-aa7c.css"]);
                assert_eq!(js.assets, vec!["assets/logo-d015.png"]);
                assert!(js.preload.is_empty());
                assert!(js.hash.is_none());
            }
            other => panic!("expected js descriptor, got {other:?}"),
        }
    }

    #[test]
    fn chunk_hash_covers_compiled_text() {
        let unit =
            OutputUnit::Chunk(ChunkUnit::new("assets/welcome-1e67.js", "welcome").with_code(JS_CODE));
        let descriptor = classify(&unit, "assets/page/welcome/index.js", Some(HashAlgorithm::Sha256));
        assert_eq!(
            descriptor.hash().map(IntegrityHash::as_str),
            Some("sha256-p/8SXaqD5c0/xF4zCzywKvLKkkIXcHh6OWwvSClTMvs=")
        );
    }

    #[test]
    fn css_request_detection_handles_queries() {
        assert!(is_css_request("assets/theme.scss"));
        assert!(is_css_request("assets/theme.scss?direct"));
        assert!(is_css_request("assets/base.sss"));
        assert!(!is_css_request("assets/app.js"));
        assert!(!is_css_request("assets/app.jsx?import"));
    }

    #[test]
    fn module_classification_is_tri_state() {
        let pure = vec!["/p/assets/theme.scss".to_string()];
        assert_eq!(classify_stylesheet_modules(&pure), StylesheetEntryKind::PureCss);

        let mixed = vec!["/p/assets/theme.scss".to_string(), "/p/assets/app.js".to_string()];
        assert_eq!(classify_stylesheet_modules(&mixed), StylesheetEntryKind::Mixed);

        let non_css = vec!["/p/assets/app.js".to_string()];
        assert_eq!(classify_stylesheet_modules(&non_css), StylesheetEntryKind::NonCss);
    }

    #[test]
    fn css_modules_and_proxies_are_not_plain_stylesheets() {
        let modules = vec!["/p/assets/button.module.css".to_string()];
        assert_ne!(classify_stylesheet_modules(&modules), StylesheetEntryKind::PureCss);

        let modules = vec![
            "/p/assets/theme.scss".to_string(),
            "/p/node_modules/lib/style.css?commonjs-proxy".to_string(),
        ];
        assert_eq!(classify_stylesheet_modules(&modules), StylesheetEntryKind::Mixed);
    }

    #[test]
    fn stylesheet_entry_requires_entry_flag_and_single_stylesheet() {
        let chunk = ChunkUnit::new("assets/theme-44b5.js", "theme")
            .entry()
            .with_facade("/home/me/project-dir/assets/theme.scss")
            .with_modules(["/home/me/project-dir/assets/theme.scss"])
            .with_css(["assets/theme-44b5.css"]);
        assert!(is_stylesheet_entry(&chunk));

        let not_entry = chunk.clone();
        let not_entry = ChunkUnit {
            is_entry: false,
            ..not_entry
        };
        assert!(!is_stylesheet_entry(&not_entry));

        let two_sheets = chunk
            .clone()
            .with_css(["assets/theme-44b5.css", "assets/extra-10ff.css"]);
        assert!(!is_stylesheet_entry(&two_sheets));
    }

    #[test]
    fn mixed_content_entry_is_not_a_stylesheet_entry() {
        let chunk = ChunkUnit::new("assets/page-9d1c.js", "page")
            .entry()
            .with_modules([
                "/home/me/project-dir/assets/page.js",
                "/home/me/project-dir/assets/page.scss",
            ])
            .with_css(["assets/page-9d1c.css"]);
        assert!(!is_stylesheet_entry(&chunk));
    }

    #[test]
    fn asset_without_mapping_gets_placeholder_input() {
        let mapper = PathMapper::new();
        let unit = OutputUnit::Asset(AssetUnit::new("theme.css", ""));
        assert_eq!(
            recover_input_path(&unit, PassKind::Modern, &root(), &mapper),
            "_theme.css"
        );
    }

    #[test]
    fn asset_with_mapping_recovers_source() {
        let mut mapper = PathMapper::new();
        mapper.record("assets/theme.scss", "assets/theme-44b5.css");
        let unit = OutputUnit::Asset(AssetUnit::new("assets/theme-44b5.css", ""));
        assert_eq!(
            recover_input_path(&unit, PassKind::Modern, &root(), &mapper),
            "assets/theme.scss"
        );
    }

    #[test]
    fn chunk_uses_project_relative_facade() {
        let mapper = PathMapper::new();
        let unit = OutputUnit::Chunk(
            ChunkUnit::new("assets/welcome-1e67.js", "welcome")
                .with_facade("/home/me/project-dir/assets/page/welcome/index.js"),
        );
        assert_eq!(
            recover_input_path(&unit, PassKind::Modern, &root(), &mapper),
            "assets/page/welcome/index.js"
        );
    }

    #[test]
    fn legacy_pass_applies_suffix_convention() {
        let mapper = PathMapper::new();
        let unit = OutputUnit::Chunk(
            ChunkUnit::new("assets/welcome-legacy-6497.js", "welcome")
                .with_facade("/home/me/project-dir/assets/page/welcome/index.js"),
        );
        assert_eq!(
            recover_input_path(&unit, PassKind::Legacy, &root(), &mapper),
            "assets/page/welcome/index-legacy.js"
        );
    }

    #[test]
    fn already_flagged_legacy_chunk_is_not_renamed_twice() {
        let mapper = PathMapper::new();
        let unit = OutputUnit::Chunk(
            ChunkUnit::new("assets/welcome-legacy-6497.js", "welcome-legacy")
                .with_facade("/home/me/project-dir/assets/page/welcome/index-legacy.js"),
        );
        assert_eq!(
            recover_input_path(&unit, PassKind::Legacy, &root(), &mapper),
            "assets/page/welcome/index-legacy.js"
        );
    }

    #[test]
    fn polyfills_virtual_id_is_stripped() {
        let mapper = PathMapper::new();
        let unit = OutputUnit::Chunk(
            ChunkUnit::new("assets/polyfills-legacy-4096.js", "polyfills")
                .with_facade(LEGACY_POLYFILLS_ID),
        );
        assert_eq!(
            recover_input_path(&unit, PassKind::Legacy, &root(), &mapper),
            "virtual:legacy-polyfills"
        );
    }
}
