//! Property Tree Module
//!
//! A schema-less, insertion-ordered key/value store used for every fusion
//! configuration block. Readers ask for a key with the type they expect and
//! the tree creates a zero value when the key is missing.
//!
//! - `node`: `Value`, `Node`, `Tree` and the typed accessors
//! - `text`: the plain-text codec used for export, import and the CLI

mod node;
mod text;

pub use node::{Node, Tree, Value, ValueKind};
