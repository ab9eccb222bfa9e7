//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use alcove_core::Node;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a directory listing
    pub fn print_entries(&self, entries: &[&Node]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("Empty directory.");
                    return;
                }
                for node in entries {
                    if node.is_dir {
                        println!("{}/", node.name);
                    } else {
                        println!("{}", node.name);
                    }
                }
                println!("\n{} item(s)", entries.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = entries
                    .iter()
                    .map(|node| {
                        serde_json::json!({
                            "name": node.name,
                            "path": node.path.display().to_string(),
                            "is_dir": node.is_dir,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap());
            }
            OutputFormat::Quiet => {
                for node in entries {
                    println!("{}", node.name);
                }
            }
        }
    }

    /// Print a note body
    ///
    /// Quiet mode still prints the text; it is the whole point of `show`.
    pub fn print_note(&self, text: &str) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                print!("{}", text);
                if !text.is_empty() && !text.ends_with('\n') {
                    println!();
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "text": text }));
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}
