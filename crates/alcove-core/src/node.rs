//! Entries of the note tree

use std::fmt;
use std::path::PathBuf;

/// Identity of an entry in the note tree
///
/// Identity is derived from the physical location: every entry below the
/// root is keyed by its absolute path, and the root carries its own
/// variant so no file path can collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The data root directory
    Root,
    /// Any entry below the root, keyed by absolute path
    Path(PathBuf),
}

impl NodeId {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        NodeId::Path(path.into())
    }
}

impl fmt::Display for NodeId {
    /// The root renders as the empty string, the tree-widget convention
    /// for the invisible top entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Root => Ok(()),
            NodeId::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A single entry in the index: one file or directory on disk
#[derive(Debug, Clone)]
pub struct Node {
    /// File or directory name (the last path component)
    pub name: String,
    /// Absolute path on disk
    pub path: PathBuf,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// Identities of direct children, filled in by a directory scan
    pub children: Vec<NodeId>,
    /// True only while this note is open and successfully decrypted
    pub loaded: bool,
}

impl Node {
    pub(crate) fn file(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            is_dir: false,
            children: Vec::new(),
            loaded: false,
        }
    }

    pub(crate) fn directory(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            is_dir: true,
            children: Vec::new(),
            loaded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_root_displays_as_empty_string() {
        assert_eq!(NodeId::Root.to_string(), "");
        assert_eq!(
            NodeId::path("/data/notes/todo.md").to_string(),
            "/data/notes/todo.md"
        );
    }

    #[test]
    fn test_root_never_collides_with_a_path() {
        let mut index = HashMap::new();
        index.insert(NodeId::Root, "root");
        index.insert(NodeId::path(""), "empty path");

        assert_eq!(index.len(), 2);
        assert_eq!(index[&NodeId::Root], "root");
    }

    #[test]
    fn test_fresh_nodes_start_unexpanded_and_unloaded() {
        let dir = Node::directory("work".into(), "/data/work".into());
        let file = Node::file("todo.md".into(), "/data/work/todo.md".into());

        assert!(dir.children.is_empty());
        assert!(!dir.loaded);
        assert!(!file.loaded);
    }
}
