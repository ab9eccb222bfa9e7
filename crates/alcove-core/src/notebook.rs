//! Unified persistence interface
//!
//! The `Notebook` owns the pieces of the persistence layer and hands the
//! front-end a single object to talk to:
//! - `Cipher`: password-derived key, fixed for the process lifetime
//! - `NodeStore`: lazy index over the note tree on disk
//! - `Session`: the single open note
//!
//! Every mutating operation takes `&mut self`, so the single-writer
//! discipline of the persistence layer is a compile-time contract.
//!
//! ## Usage
//!
//! ```ignore
//! let mut notebook = Notebook::open("hunter2")?;
//!
//! let entries = notebook.list_children(&NodeId::Root);
//! let text = notebook.open_note(&entries[0])?;
//! notebook.save_active("updated text")?;
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cipher::Cipher;
use crate::config::Config;
use crate::error::{AlcoveError, AlcoveResult};
use crate::node::{Node, NodeId};
use crate::session::Session;
use crate::store::NodeStore;

/// Persistence facade for one note tree
pub struct Notebook {
    /// Password-derived cipher
    cipher: Cipher,
    /// Lazy filesystem index
    store: NodeStore,
    /// Open-note pointer
    session: Session,
    /// Configuration
    config: Config,
}

impl Notebook {
    /// Open the notebook at the configured data directory
    ///
    /// Loads configuration, derives the cipher from the password, and
    /// scans the top level of the tree. Callers treat a failure here as
    /// fatal; everything after startup is reported, not aborted.
    pub fn open(password: &str) -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config, password)
    }

    /// Open the notebook with a specific configuration
    pub fn open_with_config(config: Config, password: &str) -> Result<Self> {
        let cipher = Cipher::new(password);
        let mut store = NodeStore::new(config.data_dir.clone());
        store
            .scan_directory(&NodeId::Root)
            .with_context(|| format!("Failed to scan data directory {:?}", config.data_dir))?;

        info!("opened note tree at '{}'", config.data_dir.display());

        Ok(Self {
            cipher,
            store,
            session: Session::new(),
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Root of the note tree on disk
    pub fn root_dir(&self) -> &Path {
        self.store.root_dir()
    }

    /// Look up an entry's cached record
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    /// Cached entries of a directory, in file-name order
    pub fn list_children(&self, id: &NodeId) -> Vec<NodeId> {
        self.store.children_of(id)
    }

    /// Whether an entry is a directory
    pub fn is_directory(&self, id: &NodeId) -> Result<bool> {
        Ok(self.store.is_directory(id)?)
    }

    /// Re-read a directory's entries from disk
    pub fn expand(&mut self, id: &NodeId) -> Result<()> {
        self.store
            .scan_directory(id)
            .with_context(|| format!("Failed to scan '{}'", id))?;
        Ok(())
    }

    /// The currently selected entry
    pub fn selected(&self) -> Option<&NodeId> {
        self.session.active()
    }

    /// Open an entry: make it the selection and return its text
    ///
    /// Directories yield an empty string; files are decrypted with the
    /// process password.
    pub fn open_note(&mut self, id: &NodeId) -> Result<String> {
        self.session
            .open(&mut self.store, &self.cipher, id)
            .with_context(|| format!("Failed to open '{}'", id))
    }

    /// Encrypt `text` and write it into the currently open note
    pub fn save_active(&mut self, text: &str) -> Result<()> {
        self.session
            .save(&mut self.store, &self.cipher, text)
            .context("Failed to save note")?;
        Ok(())
    }

    /// Create an empty note and return its identity
    ///
    /// With no explicit parent the current selection decides where it
    /// lands: a selected directory takes it, a selected file sends it to
    /// its own directory, no selection means the root. The parent is
    /// re-scanned afterwards, so the returned identity is live.
    pub fn create_note(&mut self, parent: Option<&NodeId>, name: &str) -> Result<NodeId> {
        let target = self.resolve(parent)?;
        let id = self
            .store
            .create_file(&target, name)
            .with_context(|| format!("Failed to create note '{}'", name))?;
        self.store
            .scan_directory(&target)
            .context("Failed to refresh parent directory")?;
        Ok(id)
    }

    /// Create a directory; placement works like [`create_note`](Self::create_note)
    pub fn create_directory(&mut self, parent: Option<&NodeId>, name: &str) -> Result<NodeId> {
        let target = self.resolve(parent)?;
        let id = self
            .store
            .create_directory(&target, name)
            .with_context(|| format!("Failed to create directory '{}'", name))?;
        self.store
            .scan_directory(&target)
            .context("Failed to refresh parent directory")?;
        Ok(id)
    }

    /// Delete an entry, directories recursively
    ///
    /// Clears the selection when it pointed into the deleted subtree,
    /// then re-scans the parent so the listing reflects the removal.
    pub fn delete(&mut self, id: &NodeId) -> Result<()> {
        let parent = self.parent_of(id)?;

        self.store
            .delete(id)
            .with_context(|| format!("Failed to delete '{}'", id))?;

        if self.selection_within(id) {
            self.session.clear(&mut self.store);
        }

        self.store
            .scan_directory(&parent)
            .context("Failed to refresh parent directory")?;
        Ok(())
    }

    fn resolve(&self, parent: Option<&NodeId>) -> Result<NodeId> {
        let selected = parent.or_else(|| self.session.active());
        Ok(self.store.resolve_target(selected)?)
    }

    fn parent_of(&self, id: &NodeId) -> AlcoveResult<NodeId> {
        match id {
            NodeId::Root => Err(AlcoveError::RootProtected),
            NodeId::Path(path) => match path.parent() {
                Some(parent) if parent != self.store.root_dir() => {
                    Ok(NodeId::Path(parent.to_path_buf()))
                }
                _ => Ok(NodeId::Root),
            },
        }
    }

    fn selection_within(&self, deleted: &NodeId) -> bool {
        let Some(active) = self.session.active() else {
            return false;
        };
        match (deleted, active) {
            (NodeId::Root, _) => true,
            (_, NodeId::Root) => false,
            (NodeId::Path(deleted), NodeId::Path(active)) => active.starts_with(deleted),
        }
    }
}
