//! The single open-note session
//!
//! One note at a time is open for editing. Opening a file reads and
//! decrypts it; saving encrypts the editor text and writes it back.
//! The session tracks which identity is active and, through the node's
//! `loaded` flag, whether it ever decrypted successfully. Saves are
//! gated on that flag: a note that never decrypted cannot be blindly
//! overwritten with freshly encrypted text.

use tracing::{debug, info, warn};

use crate::cipher::Cipher;
use crate::error::{AlcoveError, AlcoveResult, SaveRejected};
use crate::node::NodeId;
use crate::store::NodeStore;

/// Pointer to the entry currently open in the editor
#[derive(Debug, Default)]
pub struct Session {
    active: Option<NodeId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected entry, if any
    pub fn active(&self) -> Option<&NodeId> {
        self.active.as_ref()
    }

    /// Open an entry and return its text
    ///
    /// Directories become the selection and yield an empty string; they
    /// are never marked loaded, so a save against them stays rejected.
    /// Files are read and decrypted first: only on success does the
    /// selection move and the node get its `loaded` flag. A failed open
    /// leaves the previous selection and its flag untouched.
    pub fn open(
        &mut self,
        store: &mut NodeStore,
        cipher: &Cipher,
        id: &NodeId,
    ) -> AlcoveResult<String> {
        if store.is_directory(id)? {
            self.switch_to(store, id.clone());
            debug!("selected directory '{}'", id);
            return Ok(String::new());
        }

        let raw = store.read_raw(id)?;
        let plaintext = match cipher.decrypt(&raw) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("could not decrypt '{}': {}", id, err);
                return Err(err.into());
            }
        };
        let text = String::from_utf8(plaintext).map_err(|source| AlcoveError::NotText {
            path: store
                .node(id)
                .map(|node| node.path.clone())
                .unwrap_or_default(),
            source,
        })?;

        self.switch_to(store, id.clone());
        store.mark_loaded(id);
        debug!("opened note '{}' ({} chars)", id, text.len());

        Ok(text)
    }

    /// Encrypt `text` and write it over the active note
    ///
    /// Rejected before any disk access unless a note is active, is a
    /// file, and carries the `loaded` flag from a successful open.
    pub fn save(&self, store: &mut NodeStore, cipher: &Cipher, text: &str) -> AlcoveResult<()> {
        let Some(id) = self.active.as_ref() else {
            return Err(SaveRejected::NoActiveNote.into());
        };
        let node = store
            .node(id)
            .ok_or_else(|| AlcoveError::UnknownNode { id: id.clone() })?;
        if node.is_dir {
            return Err(SaveRejected::ActiveIsDirectory.into());
        }
        if !node.loaded {
            return Err(SaveRejected::NotLoaded.into());
        }

        let payload = cipher.encrypt(text.as_bytes())?;
        store.write_raw(id, &payload)?;
        info!("saved note '{}' ({} bytes)", id, payload.len());

        Ok(())
    }

    /// Drop the selection and its `loaded` flag
    pub fn clear(&mut self, store: &mut NodeStore) {
        if let Some(previous) = self.active.take() {
            store.clear_loaded(&previous);
        }
    }

    fn switch_to(&mut self, store: &mut NodeStore, id: NodeId) {
        self.clear(store);
        self.active = Some(id);
    }
}
