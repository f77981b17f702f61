//! Lexical path normalization.
//!
//! Backends report entry paths joined from whatever directory was registered,
//! so they can contain `.` or `..` segments and redundant separators. Identity
//! comparison against the watched path happens on the cleaned form. Nothing
//! here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path`: drop `.` segments, fold `..` into the preceding
/// segment where there is one, and collapse separators.
///
/// An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
