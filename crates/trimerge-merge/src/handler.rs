use trimerge_types::{Path, Value};

use crate::error::MergeResult;
use crate::report::Conflict;

// ---------------------------------------------------------------------------
// MergeContext
// ---------------------------------------------------------------------------

/// The running merge, as seen by a conflict handler.
///
/// Handlers that merge containers re-enter the dispatcher through
/// [`MergeContext::merge_at`] for each child. A context lives for exactly one
/// merge call; nothing in it is shared between calls.
pub trait MergeContext {
    /// Merge the three values found at `path`, dispatching to whichever
    /// handler is registered for that location.
    fn merge_at(
        &mut self,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value>;

    /// Record a conflict the handler resolved by picking a side.
    fn record_conflict(&mut self, conflict: Conflict);
}

// ---------------------------------------------------------------------------
// ConflictHandler trait
// ---------------------------------------------------------------------------

/// A merge strategy for one category of values.
///
/// The dispatcher only calls a handler when neither branch is unchanged
/// relative to `root`, so every call sees a genuine divergence. Any of the
/// three values may be [`Value::Absent`].
///
/// The trait is object-safe and `Send + Sync` so handlers can be stored in
/// a per-path registry of `Box<dyn ConflictHandler>` and a `Merger` can be
/// shared between threads.
pub trait ConflictHandler: Send + Sync {
    /// Human-readable name of this handler (e.g., "value", "identity-set").
    fn name(&self) -> &str;

    /// Produce the merged value for `path`.
    fn resolve(
        &self,
        ctx: &mut dyn MergeContext,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value>;
}
