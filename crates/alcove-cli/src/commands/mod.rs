//! Command handlers
//!
//! One module per command family. Paths given on the command line are
//! relative to the notebook root and are resolved by walking the tree
//! one directory at a time, scanning as we go.

pub mod browse;
pub mod config;
pub mod entry;
pub mod note;
pub mod status;

use anyhow::{bail, Result};

use alcove_core::{NodeId, Notebook};

/// Resolve a `/`-separated path to an entry
///
/// An empty path (or "." or "/") names the root. Every directory along
/// the way is scanned, so the walk always sees the disk as it is now.
pub(crate) fn resolve_path(notebook: &mut Notebook, path: &str) -> Result<NodeId> {
    let mut current = NodeId::Root;

    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !notebook.is_directory(&current)? {
            bail!("'{}' is not a directory", current);
        }
        notebook.expand(&current)?;

        let next = notebook.list_children(&current).into_iter().find(|id| {
            notebook
                .node(id)
                .map(|node| node.name == segment)
                .unwrap_or(false)
        });

        match next {
            Some(id) => current = id,
            None => bail!("No entry named '{}' in {}", segment, location(&current)),
        }
    }

    Ok(current)
}

/// Split a path into its directory part and final name
pub(crate) fn split_target(path: &str) -> Result<(String, String)> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        bail!("A name is required");
    }
    match trimmed.rsplit_once('/') {
        Some((dir, name)) => Ok((dir.to_string(), name.to_string())),
        None => Ok((String::new(), trimmed.to_string())),
    }
}

fn location(id: &NodeId) -> String {
    match id {
        NodeId::Root => "the notebook root".to_string(),
        _ => format!("'{}'", id),
    }
}
