//! Entry registry
//!
//! Normalizes declared entries (name -> source path) into an ordered
//! sequence with a resolved input type. Declaration order is preserved:
//! later phases iterate entries in this order on every pass, so repeated
//! resolutions converge on the same document.

use serde::Serialize;

use crate::config::BuildConfig;
use crate::paths::{relative_path, resolve_in};

/// Source-file extensions that mark a stylesheet entry
const ENTRY_STYLESHEET_EXTS: &[&str] = &[
    ".css", ".scss", ".sass", ".less", ".styl", ".stylus", ".postcss",
];

/// What kind of source file an entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Js,
    Css,
}

/// One declared entry, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalEntry {
    pub name: String,
    /// Source path relative to the project root
    pub input_path: String,
    pub input_type: EntryType,
}

/// Declaration-ordered sequence of normalized entries
#[derive(Debug, Clone, Default)]
pub struct EntryRegistry {
    entries: Vec<LogicalEntry>,
}

impl EntryRegistry {
    /// Normalize the config's declared entries against the project root
    pub fn from_config(config: &BuildConfig) -> Self {
        let entries = config
            .entries
            .iter()
            .map(|(name, input)| {
                let absolute = resolve_in(&config.root, input);
                let input_path = relative_path(&config.root.to_string_lossy(), &absolute);
                LogicalEntry {
                    name: name.clone(),
                    input_path,
                    input_type: entry_type_of(input),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogicalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_type_of(input: &str) -> EntryType {
    let stylesheet = ENTRY_STYLESHEET_EXTS
        .iter()
        .any(|ext| input.ends_with(ext));
    if stylesheet {
        EntryType::Css
    } else {
        EntryType::Js
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_entries_relative_to_root() {
        let config = BuildConfig::default()
            .with_root("/home/me/project-dir")
            .with_entry("app", "./path/to/filename.ts")
            .with_entry("theme", "./other/place/to/theme.scss");
        let registry = EntryRegistry::from_config(&config);

        let entries: Vec<&LogicalEntry> = registry.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "app");
        assert_eq!(entries[0].input_path, "path/to/filename.ts");
        assert_eq!(entries[0].input_type, EntryType::Js);
        assert_eq!(entries[1].name, "theme");
        assert_eq!(entries[1].input_path, "other/place/to/theme.scss");
        assert_eq!(entries[1].input_type, EntryType::Css);
    }

    #[test]
    fn preserves_declaration_order() {
        let config = BuildConfig::default()
            .with_root("/p")
            .with_entry("zulu", "./z.js")
            .with_entry("alpha", "./a.js")
            .with_entry("mike", "./m.js");
        let registry = EntryRegistry::from_config(&config);

        let names: Vec<&str> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn stylesheet_extensions_classify_as_css() {
        for input in ["a.css", "a.scss", "a.sass", "a.less", "a.styl", "a.stylus", "a.postcss"] {
            assert_eq!(entry_type_of(input), EntryType::Css, "{input}");
        }
        for input in ["a.js", "a.ts", "a.jsx", "a.tsx", "a.mjs"] {
            assert_eq!(entry_type_of(input), EntryType::Js, "{input}");
        }
    }
}
