//! Status command handler

use anyhow::Result;

use alcove_core::{Config, NodeId, Notebook};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(notebook: &mut Notebook, output: &Output) -> Result<()> {
    let (notes, directories) = count(notebook, &NodeId::Root)?;
    let config_file = Config::config_file_path();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": notebook.root_dir().display().to_string(),
                    "config_file": config_file.display().to_string(),
                    "counts": {
                        "notes": notes,
                        "directories": directories
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", notebook.root_dir().display());
        }
        OutputFormat::Human => {
            println!("Alcove Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Notes:  {}", notebook.root_dir().display());
            println!("  Config: {}", config_file.display());
            println!();
            println!("Contents:");
            println!("  Notes:       {}", notes);
            println!("  Directories: {}", directories);
        }
    }

    Ok(())
}

/// Count notes and directories under an entry, scanning the whole subtree
fn count(notebook: &mut Notebook, id: &NodeId) -> Result<(usize, usize)> {
    notebook.expand(id)?;

    let mut notes = 0;
    let mut directories = 0;
    for child in notebook.list_children(id) {
        let Some(node) = notebook.node(&child) else {
            continue;
        };
        if node.is_dir {
            directories += 1;
            let (n, d) = count(notebook, &child)?;
            notes += n;
            directories += d;
        } else {
            notes += 1;
        }
    }
    Ok((notes, directories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_count_spans_the_whole_tree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a").join("b")).unwrap();
        fs::write(temp.path().join("a").join("one.md"), b"").unwrap();
        fs::write(temp.path().join("a").join("b").join("two.md"), b"").unwrap();
        fs::write(temp.path().join("three.md"), b"").unwrap();

        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let mut notebook = Notebook::open_with_config(config, "pw").unwrap();

        assert_eq!(count(&mut notebook, &NodeId::Root).unwrap(), (3, 2));
    }
}
