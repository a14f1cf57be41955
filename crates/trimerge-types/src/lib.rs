//! Foundation types for trimerge.
//!
//! This crate provides the in-memory tree representation that the merge
//! engine reads and produces. Every other trimerge crate depends on
//! `trimerge-types`.
//!
//! # Key Types
//!
//! - [`Value`]: Tree node: mapping, sequence, scalar, null, or `Absent`
//! - [`Path`]: Canonical location of a node, used to key handler overrides
//! - [`ValueKind`] / [`Category`]: Node tags and the handler category they share

pub mod error;
pub mod kind;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use kind::{Category, ValueKind};
pub use path::Path;
pub use value::{Mapping, Value};
