//! Three-way structural merge for tree documents.
//!
//! Given a common ancestor (`root`) and two divergent versions (`head` and
//! `update`), the [`Merger`] walks all three trees in lock-step and builds a
//! merged document. Subtrees changed on only one side are taken wholesale;
//! genuine divergences are handed to a [`ConflictHandler`] chosen by the
//! kind of the values and, optionally, by their [`Path`](trimerge_types::Path).
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use trimerge_merge::{Merger, ValueConflictHandler};
//! use trimerge_types::Value;
//!
//! let merger = Merger::new().with_value_handler("title", ValueConflictHandler::favor_head());
//!
//! let root = Value::from(json!({"title": "draft", "tags": ["a"]}));
//! let head = Value::from(json!({"title": "mine", "tags": ["a", "b"]}));
//! let update = Value::from(json!({"title": "theirs", "tags": ["c", "a"]}));
//!
//! let merged = merger.merge(&root, &head, &update).unwrap();
//! assert_eq!(merged, Value::from(json!({"title": "mine", "tags": ["c", "a", "b"]})));
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod merger;
pub mod ordering;
pub mod report;

// Re-exports for convenience.
pub use config::{MergerConfig, SequenceRule, ValueRule};
pub use error::{MergeError, MergeResult};
pub use handler::{ConflictHandler, MergeContext};
pub use handlers::{IdentitySetMerger, MappingMerger, ValueConflictHandler, DEFAULT_IDENTITY_FIELD};
pub use merger::Merger;
pub use ordering::merge_ordered_sets;
pub use report::{Conflict, ConflictKind, Favor, MergeOutcome};
