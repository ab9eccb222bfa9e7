//! Error handling
//!
//! Provides typed errors for cipher, store, and session operations with
//! descriptive messages and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cipher::CipherError;
use crate::node::NodeId;

/// Errors that can occur in the persistence core
#[derive(Error, Debug)]
pub enum AlcoveError {
    /// Failed to create a directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read a file or directory
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path no longer exists on disk
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Identity is not present in the index (stale or never scanned)
    #[error("Unknown entry: '{id}'. Re-scan its parent directory and try again.")]
    UnknownNode { id: NodeId },

    /// A note operation was attempted on a directory
    #[error("'{path}' is a directory, not a note")]
    IsDirectory { path: PathBuf },

    /// A directory operation was attempted on a note
    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Target name already taken
    #[error("'{path}' already exists")]
    AlreadyExists { path: PathBuf },

    /// Entry name rejected before touching the filesystem
    #[error("Invalid name '{name}': names must be non-empty and must not contain path separators")]
    InvalidName { name: String },

    /// The data root itself cannot be deleted
    #[error("The data root directory cannot be deleted")]
    RootProtected,

    /// Encryption or decryption failed
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Decrypted bytes are not valid UTF-8
    #[error("Note at '{path}' did not decrypt to valid text")]
    NotText {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Save refused before any disk write
    #[error("Save rejected: {0}")]
    SaveRejected(#[from] SaveRejected),

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Why a save was refused
///
/// Saving is gated on the session state so that a note which never
/// decrypted cannot be blindly overwritten with freshly encrypted text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejected {
    /// No note is open in the session
    #[error("no note is open")]
    NoActiveNote,

    /// The selection is a directory
    #[error("the selected entry is a directory")]
    ActiveIsDirectory,

    /// The open note was never successfully decrypted
    #[error("the note was never decrypted; re-open it before saving")]
    NotLoaded,
}

impl AlcoveError {
    /// Classify an I/O failure on a read path
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => AlcoveError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => AlcoveError::NotFound { path },
            _ => AlcoveError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Classify an I/O failure on a write path
    pub fn from_write(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => AlcoveError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => AlcoveError::NotFound { path },
            io::ErrorKind::AlreadyExists => AlcoveError::AlreadyExists { path },
            // StorageFull is not stable on all platforms, so also check
            // for "no space left" in the error message
            _ if is_disk_full_error(&error) => AlcoveError::DiskFull {
                path,
                source: error,
            },
            _ => AlcoveError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            AlcoveError::DiskFull { .. } => {
                Some("Free up disk space and try again.")
            }
            AlcoveError::PermissionDenied { .. } => {
                Some("Check file and directory permissions. You may need to run with different permissions or change ownership.")
            }
            AlcoveError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            AlcoveError::Cipher(CipherError::Decryption) => {
                Some("The password does not match the one this note was saved with, or the file was modified outside of Alcove.")
            }
            AlcoveError::UnknownNode { .. } => {
                Some("The entry list may be stale. List the parent directory again to refresh it.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates a disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for core operations
pub type AlcoveResult<T> = Result<T, AlcoveError>;
