use tracing::debug;
use trimerge_types::{Path, Value};

use crate::error::MergeResult;
use crate::handler::{ConflictHandler, MergeContext};
use crate::report::{Conflict, Favor};

/// Resolves scalar disagreements by taking one branch wholesale.
///
/// By the time this handler runs, root, head, and update all differ
/// pairwise, so there is nothing to combine: the configured [`Favor`]
/// decides. Picking `Absent` removes the key from the enclosing mapping.
#[derive(Clone, Debug, Default)]
pub struct ValueConflictHandler {
    favor: Favor,
}

impl ValueConflictHandler {
    pub fn new(favor: Favor) -> Self {
        Self { favor }
    }

    /// A handler that keeps the head branch's value.
    pub fn favor_head() -> Self {
        Self::new(Favor::Head)
    }

    /// A handler that keeps the update branch's value (the default).
    pub fn favor_update() -> Self {
        Self::new(Favor::Update)
    }

    pub fn favor(&self) -> Favor {
        self.favor
    }
}

impl ConflictHandler for ValueConflictHandler {
    fn name(&self) -> &str {
        "value"
    }

    fn resolve(
        &self,
        ctx: &mut dyn MergeContext,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value> {
        // Concurrent identical edits are not a conflict.
        if head != update {
            debug!(path = %path, favor = %self.favor, "scalar conflict resolved");
            ctx.record_conflict(Conflict::value(path, root, head, update, self.favor));
        }
        Ok(self.favor.pick(head, update).clone())
    }
}
