//! Note content commands
//!
//! The only commands that decrypt note bodies, and so the only ones
//! that need the notebook password.

use std::io::Read;

use anyhow::{bail, Context, Result};

use alcove_core::Notebook;

use crate::commands::resolve_path;
use crate::editor::edit_text;
use crate::output::Output;

/// Decrypt a note and print it
pub fn show(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let id = resolve_path(notebook, path)?;
    if notebook.is_directory(&id)? {
        bail!("'{}' is a directory. Use `alcove ls {}` to list it.", id, path);
    }

    let text = notebook.open_note(&id)?;
    output.print_note(&text);
    Ok(())
}

/// Open a note in $EDITOR, then save the result if it changed
pub fn edit(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let id = resolve_path(notebook, path)?;
    if notebook.is_directory(&id)? {
        bail!("'{}' is a directory and cannot be edited", id);
    }

    let text = notebook.open_note(&id)?;
    let edited = edit_text(&text).context("Failed to edit note")?;

    if edited == text {
        output.message("No changes.");
        return Ok(());
    }

    notebook.save_active(&edited)?;
    output.success(&format!("Saved '{}'", path.trim_matches('/')));
    Ok(())
}

/// Replace a note's text with whatever arrives on stdin
pub fn write(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let id = resolve_path(notebook, path)?;
    if notebook.is_directory(&id)? {
        bail!("'{}' is a directory and cannot be written", id);
    }

    // opening first proves the password matches what is on disk
    notebook.open_note(&id)?;

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;

    notebook.save_active(&text)?;
    output.success(&format!("Saved '{}'", path.trim_matches('/')));
    Ok(())
}
