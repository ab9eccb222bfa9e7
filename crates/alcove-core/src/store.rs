//! Filesystem-backed note index
//!
//! The store mirrors one directory tree into an in-memory index of
//! [`Node`] records keyed by [`NodeId`]. The mirror is lazy: only
//! directories that were explicitly scanned have children, and nothing
//! watches the disk. A scan rebuilds the target directory's record and
//! its direct children from scratch, so identities listed before a
//! mutation go stale until the parent is scanned again.
//!
//! All disk content passes through [`read_raw`](NodeStore::read_raw) and
//! [`write_raw`](NodeStore::write_raw) as opaque bytes; encryption is the
//! caller's concern.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{AlcoveError, AlcoveResult};
use crate::node::{Node, NodeId};

/// Index over one note tree rooted at the data directory
pub struct NodeStore {
    /// Every entry seen by a scan so far, keyed by identity
    nodes: HashMap<NodeId, Node>,
    /// Absolute path of the data root
    root: PathBuf,
}

impl NodeStore {
    /// Create a store over `root` without touching the disk
    ///
    /// The root starts unexpanded; scan it to list its entries.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::Root, Node::directory(name_of(&root), root.clone()));
        Self { nodes, root }
    }

    /// The data root directory this store mirrors
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// Look up a node record by identity
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Re-read one directory from disk, rebuilding its record and the
    /// records of its direct children
    ///
    /// Entries are listed in file-name order, so scanning an unchanged
    /// directory twice yields the same child list. Records from the
    /// previous listing are dropped, not merged: a child deleted from
    /// disk disappears from the index here, and any state its old record
    /// carried (an expanded child list, a loaded flag) is gone even when
    /// the entry still exists.
    pub fn scan_directory(&mut self, id: &NodeId) -> AlcoveResult<()> {
        let path = self.path_of(id).to_path_buf();

        let meta =
            fs::metadata(&path).map_err(|e| AlcoveError::from_read(e, path.clone()))?;
        if !meta.is_dir() {
            return Err(AlcoveError::NotADirectory { path });
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&path).map_err(|e| AlcoveError::from_read(e, path.clone()))? {
            let entry = entry.map_err(|e| AlcoveError::from_read(e, path.clone()))?;
            let file_type = entry
                .file_type()
                .map_err(|e| AlcoveError::from_read(e, entry.path()))?;
            entries.push((
                entry.file_name().to_string_lossy().into_owned(),
                entry.path(),
                file_type.is_dir(),
            ));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Drop the previous listing before installing the fresh one
        if let Some(previous) = self.nodes.get(id) {
            for child in previous.children.clone() {
                self.nodes.remove(&child);
            }
        }

        let mut children = Vec::with_capacity(entries.len());
        for (name, child_path, is_dir) in entries {
            let child_id = NodeId::Path(child_path.clone());
            let record = if is_dir {
                Node::directory(name, child_path)
            } else {
                Node::file(name, child_path)
            };
            self.nodes.insert(child_id.clone(), record);
            children.push(child_id);
        }

        debug!("scanned '{}': {} entries", path.display(), children.len());

        let mut fresh = Node::directory(name_of(&path), path);
        fresh.children = children;
        self.nodes.insert(id.clone(), fresh);

        Ok(())
    }

    /// Cached child identities of a directory
    ///
    /// Never touches the disk. Unknown identities and directories that
    /// were never scanned both yield an empty list.
    pub fn children_of(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Whether the identity names a directory, per the cached record
    pub fn is_directory(&self, id: &NodeId) -> AlcoveResult<bool> {
        Ok(self.require_known(id)?.is_dir)
    }

    /// Create an empty file named `name` inside the given directory
    ///
    /// The index is not refreshed; scan the parent to observe the new
    /// child. The returned identity becomes valid after that scan.
    pub fn create_file(&mut self, parent: &NodeId, name: &str) -> AlcoveResult<NodeId> {
        let dir = self.require_directory(parent)?;
        validate_name(name)?;
        let path = dir.join(name);

        // create_new refuses to clobber an existing entry
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| AlcoveError::from_write(e, path.clone()))?;

        info!("created note '{}'", path.display());
        Ok(NodeId::Path(path))
    }

    /// Create a directory named `name` inside the given directory
    ///
    /// Missing intermediates are created and an already existing
    /// directory is not an error. The index is not refreshed.
    pub fn create_directory(&mut self, parent: &NodeId, name: &str) -> AlcoveResult<NodeId> {
        let dir = self.require_directory(parent)?;
        validate_name(name)?;
        let path = dir.join(name);

        fs::create_dir_all(&path).map_err(|e| AlcoveError::CreateDirectory {
            path: path.clone(),
            source: e,
        })?;

        info!("created directory '{}'", path.display());
        Ok(NodeId::Path(path))
    }

    /// Remove a file, or a directory and everything under it, from disk
    ///
    /// The data root itself is protected. The index keeps the stale
    /// records until the parent directory is scanned again.
    pub fn delete(&mut self, id: &NodeId) -> AlcoveResult<()> {
        if matches!(id, NodeId::Root) {
            return Err(AlcoveError::RootProtected);
        }
        let node = self.require_known(id)?;
        let path = node.path.clone();

        let removed = if node.is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| AlcoveError::from_write(e, path.clone()))?;

        info!("deleted '{}'", path.display());
        Ok(())
    }

    /// Raw byte content of the file behind the identity
    pub fn read_raw(&self, id: &NodeId) -> AlcoveResult<Vec<u8>> {
        let node = self.require_known(id)?;
        if node.is_dir {
            return Err(AlcoveError::IsDirectory {
                path: node.path.clone(),
            });
        }
        fs::read(&node.path).map_err(|e| AlcoveError::from_read(e, node.path.clone()))
    }

    /// Replace the file behind the identity with `data`
    ///
    /// The write goes through a temp file and a rename, so a failure
    /// leaves the previous content untouched.
    pub fn write_raw(&mut self, id: &NodeId, data: &[u8]) -> AlcoveResult<()> {
        let node = self.require_known(id)?;
        if node.is_dir {
            return Err(AlcoveError::IsDirectory {
                path: node.path.clone(),
            });
        }
        atomic_write(&node.path, data)
    }

    /// The directory a new entry lands in, given the current selection
    ///
    /// A selected directory is the target itself, a selected file means
    /// its containing directory, and no selection falls back to the root.
    pub fn resolve_target(&self, selected: Option<&NodeId>) -> AlcoveResult<NodeId> {
        let Some(id) = selected else {
            return Ok(NodeId::Root);
        };
        let node = self.require_known(id)?;
        if node.is_dir {
            return Ok(id.clone());
        }
        match node.path.parent() {
            Some(parent) if parent != self.root => Ok(NodeId::Path(parent.to_path_buf())),
            _ => Ok(NodeId::Root),
        }
    }

    pub(crate) fn mark_loaded(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.loaded = true;
        }
    }

    pub(crate) fn clear_loaded(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.loaded = false;
        }
    }

    fn require_known(&self, id: &NodeId) -> AlcoveResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| AlcoveError::UnknownNode { id: id.clone() })
    }

    fn require_directory(&self, id: &NodeId) -> AlcoveResult<PathBuf> {
        let node = self.require_known(id)?;
        if !node.is_dir {
            return Err(AlcoveError::NotADirectory {
                path: node.path.clone(),
            });
        }
        Ok(node.path.clone())
    }

    fn path_of<'a>(&'a self, id: &'a NodeId) -> &'a Path {
        match id {
            NodeId::Root => &self.root,
            NodeId::Path(path) => path,
        }
    }
}

/// Reject names that would escape the target directory or collide with
/// the root sentinel
fn validate_name(name: &str) -> AlcoveResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(std::path::is_separator);
    if invalid {
        return Err(AlcoveError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Write data to a file atomically
///
/// 1. Stage the bytes into a uniquely named temp file in the same directory
/// 2. Sync the staged file to disk
/// 3. Rename it over the target path
///
/// The staging name never matches the target or any existing sibling,
/// and a failure at any step leaves the target untouched.
fn atomic_write(path: &Path, data: &[u8]) -> AlcoveResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut staging = NamedTempFile::new_in(dir)
        .map_err(|e| AlcoveError::from_write(e, dir.to_path_buf()))?;
    staging
        .write_all(data)
        .map_err(|e| AlcoveError::from_write(e, staging.path().to_path_buf()))?;
    staging
        .as_file()
        .sync_all()
        .map_err(|e| AlcoveError::from_write(e, staging.path().to_path_buf()))?;

    staging
        .persist(path)
        .map_err(|e| AlcoveError::AtomicWriteFailed {
            from: e.file.path().to_path_buf(),
            to: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, NodeStore) {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("alpha")).unwrap();
        fs::write(temp.path().join("alpha").join("inner.md"), b"").unwrap();
        fs::write(temp.path().join("beta.md"), b"").unwrap();
        fs::write(temp.path().join("gamma.md"), b"").unwrap();

        let mut store = NodeStore::new(temp.path());
        store.scan_directory(&NodeId::Root).unwrap();
        (temp, store)
    }

    fn child_names(store: &NodeStore, id: &NodeId) -> Vec<String> {
        store
            .children_of(id)
            .iter()
            .map(|child| store.node(child).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_scan_lists_entries_in_name_order() {
        let (_temp, store) = seeded_store();

        assert_eq!(
            child_names(&store, &NodeId::Root),
            vec!["alpha", "beta.md", "gamma.md"]
        );
    }

    #[test]
    fn test_scan_is_idempotent() {
        let (_temp, mut store) = seeded_store();

        let first = store.children_of(&NodeId::Root);
        store.scan_directory(&NodeId::Root).unwrap();
        let second = store.children_of(&NodeId::Root);

        assert_eq!(first, second);
    }

    #[test]
    fn test_subdirectories_stay_unexpanded_until_scanned() {
        let (temp, mut store) = seeded_store();
        let alpha = NodeId::path(temp.path().join("alpha"));

        assert!(store.children_of(&alpha).is_empty());

        store.scan_directory(&alpha).unwrap();
        assert_eq!(child_names(&store, &alpha), vec!["inner.md"]);
    }

    #[test]
    fn test_children_of_unknown_identity_is_empty() {
        let (_temp, store) = seeded_store();

        let unknown = NodeId::path("/nowhere/at/all");
        assert!(store.children_of(&unknown).is_empty());
    }

    #[test]
    fn test_is_directory() {
        let (temp, store) = seeded_store();

        assert!(store.is_directory(&NodeId::Root).unwrap());
        assert!(store
            .is_directory(&NodeId::path(temp.path().join("alpha")))
            .unwrap());
        assert!(!store
            .is_directory(&NodeId::path(temp.path().join("beta.md")))
            .unwrap());

        let err = store
            .is_directory(&NodeId::path("/nowhere/at/all"))
            .unwrap_err();
        assert!(matches!(err, AlcoveError::UnknownNode { .. }));
    }

    #[test]
    fn test_scan_rejects_files() {
        let (temp, mut store) = seeded_store();

        let err = store
            .scan_directory(&NodeId::path(temp.path().join("beta.md")))
            .unwrap_err();
        assert!(matches!(err, AlcoveError::NotADirectory { .. }));
    }

    #[test]
    fn test_scan_tolerates_empty_directories() {
        let temp = TempDir::new().unwrap();
        let mut store = NodeStore::new(temp.path());

        store.scan_directory(&NodeId::Root).unwrap();
        assert!(store.children_of(&NodeId::Root).is_empty());
    }

    #[test]
    fn test_create_file_needs_explicit_rescan() {
        let (temp, mut store) = seeded_store();

        let id = store.create_file(&NodeId::Root, "delta.md").unwrap();
        assert_eq!(id, NodeId::path(temp.path().join("delta.md")));
        assert!(temp.path().join("delta.md").exists());

        // not listed until the parent is scanned again
        assert!(!store.children_of(&NodeId::Root).contains(&id));
        assert!(store.node(&id).is_none());

        store.scan_directory(&NodeId::Root).unwrap();
        assert!(store.children_of(&NodeId::Root).contains(&id));
        assert!(!store.node(&id).unwrap().is_dir);
    }

    #[test]
    fn test_create_file_rejects_existing() {
        let (_temp, mut store) = seeded_store();

        let err = store.create_file(&NodeId::Root, "beta.md").unwrap_err();
        assert!(matches!(err, AlcoveError::AlreadyExists { .. }));
    }

    #[test]
    fn test_create_file_rejects_bad_names() {
        let (_temp, mut store) = seeded_store();

        for name in ["", ".", "..", "a/b", "../escape"] {
            let result = store.create_file(&NodeId::Root, name);
            assert!(
                matches!(result, Err(AlcoveError::InvalidName { .. })),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_create_file_rejects_file_parent() {
        let (temp, mut store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));

        let err = store.create_file(&beta, "x.md").unwrap_err();
        assert!(matches!(err, AlcoveError::NotADirectory { .. }));

        let err = store
            .create_file(&NodeId::path("/nowhere"), "x.md")
            .unwrap_err();
        assert!(matches!(err, AlcoveError::UnknownNode { .. }));
    }

    #[test]
    fn test_create_directory_is_idempotent() {
        let (temp, mut store) = seeded_store();

        let first = store.create_directory(&NodeId::Root, "journal").unwrap();
        let second = store.create_directory(&NodeId::Root, "journal").unwrap();

        assert_eq!(first, second);
        assert!(temp.path().join("journal").is_dir());
    }

    #[test]
    fn test_delete_then_rescan_clears_stale_identity() {
        let (temp, mut store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));

        store.delete(&beta).unwrap();
        assert!(!temp.path().join("beta.md").exists());

        // stale until the parent is scanned: still listed, reads fail
        assert!(store.children_of(&NodeId::Root).contains(&beta));
        assert!(matches!(
            store.read_raw(&beta),
            Err(AlcoveError::NotFound { .. })
        ));

        store.scan_directory(&NodeId::Root).unwrap();
        assert!(!store.children_of(&NodeId::Root).contains(&beta));
        assert!(store.node(&beta).is_none());
        assert!(matches!(
            store.read_raw(&beta),
            Err(AlcoveError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_delete_directory_removes_subtree() {
        let (temp, mut store) = seeded_store();
        let alpha = NodeId::path(temp.path().join("alpha"));

        store.delete(&alpha).unwrap();
        assert!(!temp.path().join("alpha").exists());
    }

    #[test]
    fn test_delete_root_rejected() {
        let (_temp, mut store) = seeded_store();

        let err = store.delete(&NodeId::Root).unwrap_err();
        assert!(matches!(err, AlcoveError::RootProtected));
    }

    #[test]
    fn test_read_and_write_raw_reject_directories() {
        let (temp, mut store) = seeded_store();
        let alpha = NodeId::path(temp.path().join("alpha"));

        assert!(matches!(
            store.read_raw(&alpha),
            Err(AlcoveError::IsDirectory { .. })
        ));
        assert!(matches!(
            store.write_raw(&alpha, b"x"),
            Err(AlcoveError::IsDirectory { .. })
        ));
    }

    #[test]
    fn test_write_raw_roundtrip_without_leftover_temp() {
        let (temp, mut store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));

        store.write_raw(&beta, b"payload bytes").unwrap();
        assert_eq!(store.read_raw(&beta).unwrap(), b"payload bytes");

        // nothing staged survives a successful write
        store.scan_directory(&NodeId::Root).unwrap();
        assert_eq!(
            child_names(&store, &NodeId::Root),
            vec!["alpha", "beta.md", "gamma.md"]
        );
    }

    #[test]
    fn test_write_raw_keeps_tmp_named_sibling() {
        let (temp, mut store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));
        fs::write(temp.path().join("beta.tmp"), b"a note of its own").unwrap();

        store.write_raw(&beta, b"fresh payload").unwrap();

        assert_eq!(store.read_raw(&beta).unwrap(), b"fresh payload");
        assert_eq!(
            fs::read(temp.path().join("beta.tmp")).unwrap(),
            b"a note of its own"
        );
    }

    #[test]
    fn test_write_raw_to_tmp_extension_note() {
        let (temp, mut store) = seeded_store();
        fs::write(temp.path().join("draft.tmp"), b"first").unwrap();
        store.scan_directory(&NodeId::Root).unwrap();
        let draft = NodeId::path(temp.path().join("draft.tmp"));

        store.write_raw(&draft, b"second").unwrap();

        assert_eq!(store.read_raw(&draft).unwrap(), b"second");
        store.scan_directory(&NodeId::Root).unwrap();
        assert_eq!(
            child_names(&store, &NodeId::Root),
            vec!["alpha", "beta.md", "draft.tmp", "gamma.md"]
        );
    }

    #[test]
    fn test_path_of() {
        let (temp, store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));

        assert_eq!(store.path_of(&NodeId::Root), temp.path());
        assert_eq!(store.path_of(&beta), temp.path().join("beta.md"));
    }

    #[test]
    fn test_resolve_target() {
        let (temp, store) = seeded_store();
        let alpha = NodeId::path(temp.path().join("alpha"));
        let beta = NodeId::path(temp.path().join("beta.md"));

        // no selection falls back to the root
        assert_eq!(store.resolve_target(None).unwrap(), NodeId::Root);
        // a directory is the target itself
        assert_eq!(store.resolve_target(Some(&alpha)).unwrap(), alpha);
        // a file at the top level resolves to the root
        assert_eq!(store.resolve_target(Some(&beta)).unwrap(), NodeId::Root);

        let err = store
            .resolve_target(Some(&NodeId::path("/nowhere")))
            .unwrap_err();
        assert!(matches!(err, AlcoveError::UnknownNode { .. }));
    }

    #[test]
    fn test_resolve_target_file_in_subdirectory() {
        let (temp, mut store) = seeded_store();
        let alpha = NodeId::path(temp.path().join("alpha"));
        store.scan_directory(&alpha).unwrap();

        let inner = NodeId::path(temp.path().join("alpha").join("inner.md"));
        assert_eq!(store.resolve_target(Some(&inner)).unwrap(), alpha);
    }

    #[test]
    fn test_rescan_resets_loaded() {
        let (temp, mut store) = seeded_store();
        let beta = NodeId::path(temp.path().join("beta.md"));

        store.mark_loaded(&beta);
        assert!(store.node(&beta).unwrap().loaded);

        store.scan_directory(&NodeId::Root).unwrap();
        assert!(!store.node(&beta).unwrap().loaded);
    }
}
