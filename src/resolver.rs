//! Entrypoint graph resolver
//!
//! Walks the descriptor map from each entry's root descriptor and partitions
//! everything it discovers by role: render-blocking stylesheets, the entry's
//! own scripts, eager preloads, and deferred dynamic imports. Lists preserve
//! first-discovery order because it determines browser fetch order, and
//! deduplicate by exact path equality, never sorted.
//!
//! The walk is iterative with an explicit frame stack; one visited-set is
//! threaded through every step to guard cycles and diamond shapes. Import
//! chains hundreds of modules deep therefore cost heap, not call stack.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::bundler::LEGACY_POLYFILLS_ID;
use crate::classify::FileDescriptor;
use crate::entries::EntryRegistry;
use crate::error::{GantryError, GantryResult};
use crate::manifest::ResourceBundle;
use crate::path_mapping::PathMapper;
use crate::paths::{legacy_name, strip_nul};

/// Decides whether an otherwise-unresolvable import is provided externally.
///
/// Consulted only for imports with no descriptor in the map; everything else
/// resolves through the graph. Plain `fn` predicates qualify alongside
/// dedicated implementations.
pub trait ExternalResolver {
    fn is_external(&self, id: &str, importer: &str) -> bool;
}

impl ExternalResolver for fn(&str, &str) -> bool {
    fn is_external(&self, id: &str, importer: &str) -> bool {
        self(id, importer)
    }
}

/// One in-flight level of the traversal
struct Frame<'a> {
    descriptor: &'a FileDescriptor,
    import_idx: usize,
    css: Vec<String>,
    js: Vec<String>,
    preload: Vec<String>,
    dynamic: Vec<String>,
}

impl<'a> Frame<'a> {
    fn new(descriptor: &'a FileDescriptor) -> Self {
        Self {
            descriptor,
            import_idx: 0,
            css: Vec::new(),
            js: Vec::new(),
            preload: Vec::new(),
            dynamic: Vec::new(),
        }
    }

    /// Append the descriptor's own outputs, prefixed, after all imports
    /// have been folded in.
    fn flush_own(&mut self, base: &str) {
        let descriptor = self.descriptor;
        match descriptor {
            FileDescriptor::Js(js) => {
                for path in &js.js {
                    push_unique(&mut self.js, format!("{base}{path}"));
                }
                for path in &js.preload {
                    push_unique(&mut self.preload, format!("{base}{path}"));
                }
                for path in &js.dynamic {
                    push_unique(&mut self.dynamic, format!("{base}{path}"));
                }
                for path in &js.css {
                    push_unique(&mut self.css, format!("{base}{path}"));
                }
            }
            FileDescriptor::Css(css) => {
                for path in &css.css {
                    push_unique(&mut self.css, format!("{base}{path}"));
                }
            }
            FileDescriptor::Asset(_) => {}
        }
    }

    /// Fold a finished child level into this one. The child's own scripts
    /// become preloads here; css and dynamic keep their roles.
    fn absorb(&mut self, child: Frame<'_>) {
        for path in child.css {
            push_unique(&mut self.css, path);
        }
        for path in child.js {
            push_unique(&mut self.preload, path);
        }
        for path in child.preload {
            push_unique(&mut self.preload, path);
        }
        for path in child.dynamic {
            push_unique(&mut self.dynamic, path);
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Resolve one entry's root descriptor into its resource bundle.
///
/// Every emitted path carries the `base` prefix. A static import with no
/// descriptor is skipped when the external predicate claims it; otherwise
/// the whole resolution fails, naming the missing path and its importer.
pub fn resolve_entry_bundle(
    root: &FileDescriptor,
    files: &IndexMap<String, FileDescriptor>,
    external: &dyn ExternalResolver,
    base: &str,
    legacy: Option<String>,
) -> GantryResult<ResourceBundle> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(root.output_path().to_string());
    let mut stack: Vec<Frame<'_>> = vec![Frame::new(root)];

    loop {
        let top = stack.len() - 1;

        // Descend into the next unvisited import of the top frame, if any.
        let next = loop {
            let frame = &mut stack[top];
            let descriptor = frame.descriptor;
            let FileDescriptor::Js(js) = descriptor else {
                break None;
            };
            let Some(import) = js.imports.get(frame.import_idx) else {
                break None;
            };
            frame.import_idx += 1;
            if visited.contains(import.as_str()) {
                continue;
            }
            visited.insert(import.clone());
            break Some(import.clone());
        };

        if let Some(import) = next {
            match files.get(import.as_str()) {
                Some(descriptor) => stack.push(Frame::new(descriptor)),
                None => {
                    let importer = stack[top].descriptor.input_path();
                    if !external.is_external(&import, importer) {
                        return Err(GantryError::UnresolvedImport {
                            import,
                            importer: importer.to_string(),
                        });
                    }
                }
            }
            continue;
        }

        // Imports exhausted: flush own outputs, then fold into the parent.
        let mut finished = stack.swap_remove(top);
        finished.flush_own(base);
        match stack.last_mut() {
            Some(parent) => parent.absorb(finished),
            None => {
                return Ok(ResourceBundle {
                    css: finished.css,
                    dynamic: finished.dynamic,
                    js: finished.js,
                    legacy,
                    preload: finished.preload,
                })
            }
        }
    }
}

/// Resolve every declared entry into the manifest's entry-point map.
///
/// Entries resolve in declaration order. When a legacy twin exists (same
/// input path under the legacy-suffix convention), it is resolved
/// independently as `<entry>-legacy` and back-referenced from the modern
/// bundle; legacy resources are never merged into the modern one. If any
/// entry paired up, the shared polyfills pseudo-entry is resolved once as
/// `polyfills-legacy`.
pub fn build_entry_points(
    registry: &EntryRegistry,
    mapper: &PathMapper,
    files: &IndexMap<String, FileDescriptor>,
    external: &dyn ExternalResolver,
    base: &str,
) -> GantryResult<IndexMap<String, ResourceBundle>> {
    let mut entry_points: IndexMap<String, ResourceBundle> = IndexMap::new();
    let mut has_legacy = false;

    for entry in registry.iter() {
        let descriptor = mapper
            .output(&entry.input_path)
            .and_then(|output| files.get(output))
            .ok_or_else(|| GantryError::MissingEntryOutput {
                entry: entry.name.clone(),
                input: entry.input_path.clone(),
            })?;

        let legacy_descriptor = mapper
            .output(&legacy_name(&entry.input_path))
            .and_then(|output| files.get(output));
        let legacy_ref = match legacy_descriptor {
            Some(twin) => {
                has_legacy = true;
                let twin_name = format!("{}-legacy", entry.name);
                let bundle = resolve_entry_bundle(twin, files, external, base, None)?;
                entry_points.insert(twin_name.clone(), bundle);
                Some(twin_name)
            }
            None => None,
        };

        let bundle = resolve_entry_bundle(descriptor, files, external, base, legacy_ref)?;
        entry_points.insert(entry.name.clone(), bundle);
    }

    if has_legacy {
        let polyfills_input = strip_nul(LEGACY_POLYFILLS_ID);
        if let Some(descriptor) = mapper
            .output(&polyfills_input)
            .and_then(|output| files.get(output))
        {
            let bundle = resolve_entry_bundle(descriptor, files, external, base, None)?;
            entry_points.insert("polyfills-legacy".to_string(), bundle);
        }
    }

    Ok(entry_points)
}
