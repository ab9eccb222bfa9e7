//! Alcove Core Library
//!
//! This crate provides the persistence layer for Alcove, a desktop
//! notebook whose notes live as individually encrypted files in a
//! directory tree.
//!
//! # Architecture
//!
//! - **Filesystem as source of truth**: every note is one file, every
//!   folder is one directory, nothing else is stored
//! - **Encryption at rest**: note bodies are sealed with a key derived
//!   from the user's password; names and layout stay readable
//! - **Lazy indexing**: directories are read from disk only when the
//!   front-end looks at them
//!
//! # Quick Start
//!
//! ```text
//! let mut notebook = Notebook::open("hunter2")?;
//!
//! // Browse the tree
//! let entries = notebook.list_children(&NodeId::Root);
//!
//! // Read and edit a note
//! let text = notebook.open_note(&entries[0])?;
//! notebook.save_active(&format!("{text}\n- new line"))?;
//! ```
//!
//! # Modules
//!
//! - `notebook`: Unified persistence interface (main entry point)
//! - `store`: Lazy filesystem index over the note tree
//! - `session`: Open-note state and save gating
//! - `cipher`: Password-derived authenticated encryption
//! - `node`: Entry identities and records
//! - `config`: Application configuration
//! - `error`: Error types shared across the crate

pub mod cipher;
pub mod config;
pub mod error;
pub mod node;
pub mod notebook;
pub mod session;
pub mod store;

pub use cipher::{Cipher, CipherError};
pub use config::Config;
pub use error::{AlcoveError, AlcoveResult, SaveRejected};
pub use node::{Node, NodeId};
pub use notebook::Notebook;
pub use session::Session;
pub use store::NodeStore;
