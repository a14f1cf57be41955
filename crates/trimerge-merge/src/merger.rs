use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};
use trimerge_types::{Category, Path, Value};

use crate::error::{MergeError, MergeResult};
use crate::handler::{ConflictHandler, MergeContext};
use crate::handlers::{IdentitySetMerger, MappingMerger, ValueConflictHandler};
use crate::report::{Conflict, MergeOutcome};

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// The three-way merge dispatcher.
///
/// Holds the handler registries: per-path overrides for scalar and sequence
/// locations, plus one default handler per category. A `Merger` is immutable
/// once built and can be reused (and shared between threads) for any number
/// of independent merges.
pub struct Merger {
    value_handlers: BTreeMap<Path, Box<dyn ConflictHandler>>,
    sequence_handlers: BTreeMap<Path, Box<dyn ConflictHandler>>,
    default_value_handler: Box<dyn ConflictHandler>,
    default_mapping_handler: Box<dyn ConflictHandler>,
    default_sequence_handler: Box<dyn ConflictHandler>,
}

impl Default for Merger {
    fn default() -> Self {
        Self {
            value_handlers: BTreeMap::new(),
            sequence_handlers: BTreeMap::new(),
            default_value_handler: Box::new(ValueConflictHandler::default()),
            default_mapping_handler: Box::new(MappingMerger),
            default_sequence_handler: Box::new(IdentitySetMerger::default()),
        }
    }
}

impl Merger {
    /// Create a merger with the built-in defaults: update wins scalar
    /// conflicts, sequences are identity sets keyed by `"id"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the scalar handler at one location.
    pub fn with_value_handler<H>(mut self, path: impl Into<Path>, handler: H) -> Self
    where
        H: ConflictHandler + 'static,
    {
        self.value_handlers.insert(path.into(), Box::new(handler));
        self
    }

    /// Override the sequence handler at one location.
    pub fn with_sequence_handler<H>(mut self, path: impl Into<Path>, handler: H) -> Self
    where
        H: ConflictHandler + 'static,
    {
        self.sequence_handlers.insert(path.into(), Box::new(handler));
        self
    }

    pub fn with_default_value_handler<H>(mut self, handler: H) -> Self
    where
        H: ConflictHandler + 'static,
    {
        self.default_value_handler = Box::new(handler);
        self
    }

    pub fn with_default_mapping_handler<H>(mut self, handler: H) -> Self
    where
        H: ConflictHandler + 'static,
    {
        self.default_mapping_handler = Box::new(handler);
        self
    }

    pub fn with_default_sequence_handler<H>(mut self, handler: H) -> Self
    where
        H: ConflictHandler + 'static,
    {
        self.default_sequence_handler = Box::new(handler);
        self
    }

    /// The handler that resolves `category` values at `path`.
    pub fn handler_for(&self, path: &Path, category: Category) -> &dyn ConflictHandler {
        match category {
            Category::Scalar => self
                .value_handlers
                .get(path)
                .unwrap_or(&self.default_value_handler)
                .as_ref(),
            Category::Mapping => self.default_mapping_handler.as_ref(),
            Category::Sequence => self
                .sequence_handlers
                .get(path)
                .unwrap_or(&self.default_sequence_handler)
                .as_ref(),
        }
    }

    /// Three-way merge of `head` and `update` against their common
    /// ancestor `root`.
    ///
    /// The result is a freshly built tree; none of the inputs are modified.
    /// It is `Absent` only if the document as a whole was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use trimerge_merge::Merger;
    /// use trimerge_types::Value;
    ///
    /// let root = Value::from(json!({"a": 1}));
    /// let head = Value::from(json!({"a": 1, "b": 2}));
    /// let update = Value::from(json!({"a": 1, "c": 3}));
    ///
    /// let merged = Merger::new().merge(&root, &head, &update).unwrap();
    /// assert_eq!(merged, Value::from(json!({"a": 1, "b": 2, "c": 3})));
    /// ```
    pub fn merge(&self, root: &Value, head: &Value, update: &Value) -> MergeResult<Value> {
        self.merge_with_report(root, head, update)
            .map(|outcome| outcome.value)
    }

    /// Merge with no head branch: `head` is `Absent`.
    ///
    /// The usual rules apply, so keys that `update` left equal to `root`
    /// follow the absent head and are dropped. With an `Absent` root this
    /// simply yields `update`.
    pub fn merge_onto(&self, root: &Value, update: &Value) -> MergeResult<Value> {
        self.merge(root, &Value::Absent, update)
    }

    /// Like [`Self::merge`], also returning every conflict that was
    /// resolved by picking a side.
    pub fn merge_with_report(
        &self,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<MergeOutcome> {
        let mut session = MergeSession::new(self);
        let value = session.merge_at(&Path::root(), root, head, update)?;
        debug!(conflicts = session.conflicts.len(), "merge complete");
        Ok(MergeOutcome {
            value,
            conflicts: session.conflicts,
        })
    }
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |registry: &BTreeMap<Path, Box<dyn ConflictHandler>>| {
            registry
                .iter()
                .map(|(path, h)| (path.to_string(), h.name().to_string()))
                .collect::<Vec<_>>()
        };
        f.debug_struct("Merger")
            .field("value_handlers", &names(&self.value_handlers))
            .field("sequence_handlers", &names(&self.sequence_handlers))
            .field("default_value_handler", &self.default_value_handler.name())
            .field("default_mapping_handler", &self.default_mapping_handler.name())
            .field("default_sequence_handler", &self.default_sequence_handler.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MergeSession
// ---------------------------------------------------------------------------

/// State of a single merge call.
struct MergeSession<'m> {
    merger: &'m Merger,
    conflicts: Vec<Conflict>,
}

impl<'m> MergeSession<'m> {
    fn new(merger: &'m Merger) -> Self {
        Self {
            merger,
            conflicts: Vec::new(),
        }
    }
}

impl MergeContext for MergeSession<'_> {
    fn merge_at(
        &mut self,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value> {
        // Only one side changed: take it wholesale.
        if root == head {
            return Ok(update.clone());
        }
        if root == update {
            return Ok(head.clone());
        }

        let (root_kind, head_kind, update_kind) = (root.kind(), head.kind(), update.kind());
        let category = Category::common(root_kind, head_kind, update_kind).ok_or_else(|| {
            MergeError::TypeConflict {
                path: path.clone(),
                root: root_kind,
                head: head_kind,
                update: update_kind,
            }
        })?;

        let merger = self.merger;
        let handler = merger.handler_for(path, category);
        trace!(path = %path, %category, handler = handler.name(), "dispatching");
        handler.resolve(self, path, root, head, update)
    }

    fn record_conflict(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }
}
