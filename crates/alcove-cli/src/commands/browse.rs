//! Directory listing commands

use anyhow::{bail, Result};

use alcove_core::{NodeId, Notebook};

use crate::commands::resolve_path;
use crate::output::{Output, OutputFormat};

/// List the entries of one directory
pub fn ls(notebook: &mut Notebook, path: Option<&str>, output: &Output) -> Result<()> {
    let id = resolve_path(notebook, path.unwrap_or(""))?;

    if !notebook.is_directory(&id)? {
        bail!("'{}' is not a directory", id);
    }
    notebook.expand(&id)?;

    let children = notebook.list_children(&id);
    let entries: Vec<_> = children
        .iter()
        .filter_map(|child| notebook.node(child))
        .collect();

    output.print_entries(&entries);
    Ok(())
}

/// Print the whole note tree
pub fn tree(notebook: &mut Notebook, output: &Output) -> Result<()> {
    let mut rows = Vec::new();
    walk(notebook, &NodeId::Root, "", 0, &mut rows)?;

    match output.format {
        OutputFormat::Human => {
            println!(".");
            for row in &rows {
                let indent = "  ".repeat(row.depth + 1);
                let name = row.path.rsplit('/').next().unwrap_or(&row.path);
                let suffix = if row.is_dir { "/" } else { "" };
                println!("{}{}{}", indent, name, suffix);
            }
            println!("\n{} item(s)", rows.len());
        }
        OutputFormat::Json => {
            let items: Vec<_> = rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "path": row.path,
                        "is_dir": row.is_dir,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Quiet => {
            for row in &rows {
                println!("{}", row.path);
            }
        }
    }
    Ok(())
}

struct TreeRow {
    /// Path relative to the notebook root
    path: String,
    depth: usize,
    is_dir: bool,
}

/// Depth-first walk, scanning each directory as it is reached
fn walk(
    notebook: &mut Notebook,
    id: &NodeId,
    prefix: &str,
    depth: usize,
    rows: &mut Vec<TreeRow>,
) -> Result<()> {
    notebook.expand(id)?;

    for child in notebook.list_children(id) {
        let Some(node) = notebook.node(&child) else {
            continue;
        };
        let path = if prefix.is_empty() {
            node.name.clone()
        } else {
            format!("{}/{}", prefix, node.name)
        };
        let is_dir = node.is_dir;

        rows.push(TreeRow {
            path: path.clone(),
            depth,
            is_dir,
        });

        if is_dir {
            walk(notebook, &child, &path, depth + 1, rows)?;
        }
    }
    Ok(())
}
