//! `laxjson` CLI: check, minify, and query permissive JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Check that a document parses (reads stdin by default)
//! echo '{name: demo}' | laxjson check
//!
//! # Minify a commented, loosely-quoted document to plain JSON
//! laxjson minify -i config.json
//!
//! # Pretty-print instead
//! laxjson minify --pretty -i config.json
//!
//! # Print the value at a dotted path (object keys and array indices)
//! laxjson get menu.items.0 -i config.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use laxjson_core::{Document, NodeType};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "laxjson",
    version,
    about = "Permissive JSON (comments, unquoted tokens) parser and document tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and report its top-level shape
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Parse a permissive document and emit minimal JSON
    Minify {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the result instead of minifying
        #[arg(long)]
        pretty: bool,
    },
    /// Print the value at a dotted path, e.g. `menu.items.0`
    Get {
        /// Dotted path of object keys and array indices
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let doc = parse_document(&text)?;
            println!(
                "OK: {} top-level attributes",
                doc.attribute_count(doc.root())
            );
        }
        Commands::Minify {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let doc = parse_document(&text)?;
            let json = doc.to_json(doc.root());
            let rendered = if pretty {
                let value: serde_json::Value = serde_json::from_str(&json)?;
                serde_json::to_string_pretty(&value)?
            } else {
                json
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Get { path, input } => {
            let text = read_input(input.as_deref())?;
            let doc = parse_document(&text)?;
            let node = resolve_path(&doc, &path)?;
            println!("{}", doc.to_json(node));
        }
    }

    Ok(())
}

fn parse_document(text: &str) -> Result<Document> {
    laxjson_core::parse(text).context("Failed to parse document")
}

/// Walks a dotted path from the root: object segments are attribute names,
/// array segments are zero-based indices.
fn resolve_path(doc: &Document, path: &str) -> Result<laxjson_core::NodeId> {
    let mut current = doc.root();
    for segment in path.split('.') {
        current = match doc.node_type(current) {
            NodeType::Object => match doc.get(current, segment) {
                Some(child) => child,
                None => bail!("No attribute '{}' in path '{}'", segment, path),
            },
            NodeType::Array => {
                let index: usize = segment
                    .parse()
                    .with_context(|| format!("'{}' is not an array index", segment))?;
                match doc.at(current, index) {
                    Some(child) => child,
                    None => bail!("Index {} out of bounds in path '{}'", index, path),
                }
            }
            _ => bail!("Path '{}' descends into a scalar at '{}'", path, segment),
        };
    }
    Ok(current)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
