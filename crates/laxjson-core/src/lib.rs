//! # laxjson-core
//!
//! Parser and mutable document tree for a **permissive superset of JSON**.
//!
//! The grammar accepts everything plain JSON does, plus `//` and `/* */`
//! comments, unquoted tokens (which become strings, or booleans when they
//! read as `true`/`false`), unbraced top-level documents, `;` as a
//! separator, and trailing commas in arrays. A repeated attribute name
//! folds its values into an array instead of overwriting. Parsing is a
//! single pass driven by a `const` state/class dispatch table.
//!
//! Parsed data lands in a [`Document`]: an arena of nodes addressed by
//! copyable [`NodeId`] handles, navigable both down (children) and up
//! (parents), and mutable in place.
//!
//! ## Quick start
//!
//! ```rust
//! use laxjson_core::parse;
//!
//! let doc = parse(r#"{
//!     // free-form comments are fine
//!     "name": "demo",
//!     size: { width: 100, height: 100 },
//!     "tags": [alpha, beta],
//! }"#).unwrap();
//!
//! let root = doc.root();
//! let name = doc.get(root, "name").unwrap();
//! assert_eq!(doc.string_value(name), Some("demo"));
//!
//! let size = doc.get(root, "size").unwrap();
//! assert_eq!(doc.attribute_count(size), 2);
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: table-driven parse into a document ([`parse`],
//!   `Document::parse_str`, `Document::parse_file`)
//! - [`node`]: the document tree: navigation, mutation, coercions,
//!   minimal-JSON serialization
//! - [`cursor`]: position-tracking input cursor with token lookahead
//! - [`charmap`]: byte classification tables
//! - [`strings`]: scalar conversion helpers
//! - [`error`]: error types

pub mod charmap;
pub mod cursor;
pub mod error;
pub mod node;
pub mod parser;
pub mod strings;

pub use error::{Error, Result};
pub use node::{Document, NodeId, NodeType};
pub use parser::parse;
