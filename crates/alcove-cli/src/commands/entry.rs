//! Entry creation and deletion commands

use anyhow::{bail, Result};

use alcove_core::{NodeId, Notebook};

use crate::commands::{resolve_path, split_target};
use crate::editor::confirm;
use crate::output::Output;

/// Create an empty note
pub fn new(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let (dir, name) = split_target(path)?;
    let parent = resolve_path(notebook, &dir)?;

    notebook.create_note(Some(&parent), &name)?;

    output.success(&format!("Created '{}'", path.trim_matches('/')));
    Ok(())
}

/// Create a directory
pub fn mkdir(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let (dir, name) = split_target(path)?;
    let parent = resolve_path(notebook, &dir)?;

    notebook.create_directory(Some(&parent), &name)?;

    output.success(&format!("Created '{}/'", path.trim_matches('/')));
    Ok(())
}

/// Delete a note or a directory (directories recursively)
pub fn rm(notebook: &mut Notebook, path: &str, output: &Output) -> Result<()> {
    let id = resolve_path(notebook, path)?;
    if matches!(id, NodeId::Root) {
        bail!("Refusing to delete the notebook root");
    }

    if output.should_prompt() {
        let kind = if notebook.is_directory(&id)? {
            "directory (and everything in it)"
        } else {
            "note"
        };
        if !confirm(&format!("Delete {} '{}'?", kind, path.trim_matches('/')))? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    notebook.delete(&id)?;

    output.success(&format!("Deleted '{}'", path.trim_matches('/')));
    Ok(())
}
