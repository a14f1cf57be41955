//! Conflict report: what the engine decided on its own.
//!
//! Every time a handler has to pick a side instead of combining changes, it
//! records a [`Conflict`]. The report is returned by
//! [`Merger::merge_with_report`](crate::Merger::merge_with_report) so callers
//! can surface automatic decisions to a user.

use serde::{Deserialize, Serialize};
use trimerge_types::{Path, Value};

/// Which branch a conflict was resolved in favor of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favor {
    Head,
    #[default]
    Update,
}

impl Favor {
    /// Pick this side out of a head/update pair.
    pub fn pick<'a, T: ?Sized>(self, head: &'a T, update: &'a T) -> &'a T {
        match self {
            Self::Head => head,
            Self::Update => update,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for Favor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of disagreement was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both branches changed a scalar to different values.
    Value {
        root: Value,
        head: Value,
        update: Value,
    },
    /// One branch deleted a sequence item that the other modified.
    /// The modification always wins.
    ModifyDelete { identity: Value },
}

/// A single automatically resolved conflict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// Where the conflict happened.
    pub path: Path,
    /// The disagreement.
    pub kind: ConflictKind,
    /// The branch whose value ended up in the result.
    pub resolved_to: Favor,
}

impl Conflict {
    pub fn value(path: &Path, root: &Value, head: &Value, update: &Value, favor: Favor) -> Self {
        Self {
            path: path.clone(),
            kind: ConflictKind::Value {
                root: root.clone(),
                head: head.clone(),
                update: update.clone(),
            },
            resolved_to: favor,
        }
    }

    pub fn modify_delete(path: &Path, identity: &Value, kept: Favor) -> Self {
        Self {
            path: path.clone(),
            kind: ConflictKind::ModifyDelete {
                identity: identity.clone(),
            },
            resolved_to: kept,
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ConflictKind::Value { root, head, update } => write!(
                f,
                "{}: value conflict (root={root}, head={head}, update={update}), took {}",
                self.path, self.resolved_to
            ),
            ConflictKind::ModifyDelete { identity } => write!(
                f,
                "{}: item {identity} deleted on one side, kept {} modification",
                self.path, self.resolved_to
            ),
        }
    }
}

/// The merged document together with the conflicts resolved on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub value: Value,
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    /// Returns `true` if no side had to be picked over the other.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of scalar value conflicts.
    pub fn value_conflicts(&self) -> usize {
        self.conflicts
            .iter()
            .filter(|c| matches!(c.kind, ConflictKind::Value { .. }))
            .count()
    }

    /// Number of modify/delete conflicts.
    pub fn modify_delete_conflicts(&self) -> usize {
        self.conflicts
            .iter()
            .filter(|c| matches!(c.kind, ConflictKind::ModifyDelete { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favor_defaults_to_update() {
        assert_eq!(Favor::default(), Favor::Update);
    }

    #[test]
    fn favor_picks_side() {
        assert_eq!(*Favor::Head.pick(&1, &2), 1);
        assert_eq!(*Favor::Update.pick(&1, &2), 2);
    }

    #[test]
    fn conflict_display() {
        let c = Conflict::value(
            &Path::from("a.b"),
            &Value::from(1i64),
            &Value::from(2i64),
            &Value::from(3i64),
            Favor::Update,
        );
        assert_eq!(
            c.to_string(),
            "a.b: value conflict (root=1, head=2, update=3), took update"
        );

        let c = Conflict::modify_delete(&Path::from("items"), &Value::from("x"), Favor::Head);
        assert_eq!(
            c.to_string(),
            "items: item \"x\" deleted on one side, kept head modification"
        );
    }

    #[test]
    fn outcome_counts() {
        let outcome = MergeOutcome {
            value: Value::Null,
            conflicts: vec![
                Conflict::modify_delete(&Path::root(), &Value::from(1i64), Favor::Update),
                Conflict::value(
                    &Path::root(),
                    &Value::Null,
                    &Value::from(true),
                    &Value::from(false),
                    Favor::Head,
                ),
            ],
        };
        assert!(!outcome.is_clean());
        assert_eq!(outcome.value_conflicts(), 1);
        assert_eq!(outcome.modify_delete_conflicts(), 1);
    }
}
