//! Error types for the merge engine.

use thiserror::Error;
use trimerge_types::{Path, Value, ValueKind};

/// Errors that abort a merge.
///
/// Merging is deterministic, so none of these are retryable: the same three
/// documents under the same configuration always fail the same way.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The three sides have kinds no single handler category accepts.
    #[error("unable to merge types at {path}: root={root}, head={head}, update={update}")]
    TypeConflict {
        path: Path,
        root: ValueKind,
        head: ValueKind,
        update: ValueKind,
    },

    /// A mapping item of an identity-keyed sequence lacks the identity field.
    #[error("item {item} at {path} doesn't have identity field {field:?}")]
    IdentityFieldMissing {
        path: Path,
        field: String,
        item: Box<Value>,
    },

    /// The input holds a value the merge model cannot take at this location.
    #[error("unsupported value at {path}: {reason}")]
    UnsupportedValue { path: Path, reason: String },
}

impl MergeError {
    /// The location the error was raised at.
    pub fn path(&self) -> &Path {
        match self {
            Self::TypeConflict { path, .. }
            | Self::IdentityFieldMissing { path, .. }
            | Self::UnsupportedValue { path, .. } => path,
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = std::result::Result<T, MergeError>;
