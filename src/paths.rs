//! Path helpers for build-relative identifiers
//!
//! All manifest and descriptor paths are forward-slash, project-relative
//! strings. These helpers normalize whatever the bundler hands us (absolute
//! module ids, Windows separators, virtual-module NUL prefixes) into that
//! shape.

use std::path::Path;

/// Normalize a path string posix-style: fold backslashes, collapse repeated
/// separators and resolve `.` / `..` segments. A leading `/` is preserved;
/// `..` segments above an absolute root are dropped.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if absolute => {}
                _ => stack.push(".."),
            },
            _ => stack.push(segment),
        }
    }
    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Insert `-legacy` immediately before the final extension of the path's
/// basename (`index.js` becomes `index-legacy.js`). Paths without an
/// extension get the suffix appended.
pub fn legacy_name(name: &str) -> String {
    let base_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    let basename = &name[base_start..];
    match basename.rfind('.') {
        // a leading dot (dotfile) is not an extension
        Some(dot) if dot > 0 => {
            let split = base_start + dot;
            format!("{}-legacy{}", &name[..split], &name[split..])
        }
        _ => format!("{name}-legacy"),
    }
}

/// Compute the path of `to` relative to the directory `from`. Both sides are
/// normalized first; identical paths yield an empty string.
pub fn relative_path(from: &str, to: &str) -> String {
    let from = normalize_path(from);
    let to = normalize_path(to);
    if from == to {
        return String::new();
    }
    let from_parts: Vec<&str> = from.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..");
    }
    parts.extend(&to_parts[common..]);
    parts.join("/")
}

/// Resolve `path` against `root` unless it is already absolute, returning a
/// normalized string.
pub fn resolve_in(root: &Path, path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        normalize_path(&path)
    } else {
        let root = root.to_string_lossy().replace('\\', "/");
        normalize_path(&format!("{root}/{path}"))
    }
}

/// Express a bundler module id relative to the project root.
pub fn project_relative(root: &Path, id: &str) -> String {
    let root = root.to_string_lossy();
    relative_path(&root, id)
}

/// True when `child` resolves strictly inside `parent`. The same directory
/// does not count as a subdirectory.
pub fn is_subdirectory(parent: &str, child: &str) -> bool {
    let parent = normalize_path(parent);
    let child = normalize_path(child);
    if parent == child {
        return false;
    }
    let parent_dirs: Vec<&str> = parent.split('/').filter(|d| !d.is_empty()).collect();
    let child_dirs: Vec<&str> = child.split('/').filter(|d| !d.is_empty()).collect();
    parent_dirs
        .iter()
        .enumerate()
        .all(|(i, dir)| child_dirs.get(i) == Some(dir))
}

/// Strip NUL bytes used by bundlers to mark virtual module ids.
pub fn strip_nul(id: &str) -> String {
    id.replace('\0', "")
}
