use std::fmt;

/// The tag of a [`Value`](crate::Value), without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
    Absent,
}

impl ValueKind {
    /// Null, booleans, numbers, strings, and `Absent` all mix freely.
    pub fn is_scalar_class(self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool | Self::Number | Self::String | Self::Absent
        )
    }

    pub fn is_mapping_class(self) -> bool {
        matches!(self, Self::Mapping | Self::Absent)
    }

    pub fn is_sequence_class(self) -> bool {
        matches!(self, Self::Sequence | Self::Absent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler category shared by a root/head/update triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Scalar,
    Mapping,
    Sequence,
}

impl Category {
    /// Find the category all three kinds belong to.
    ///
    /// Scalar is tried first, then mapping, then sequence. Returns `None`
    /// when the kinds cannot be merged by any single handler category.
    pub fn common(root: ValueKind, head: ValueKind, update: ValueKind) -> Option<Self> {
        let kinds = [root, head, update];
        if kinds.iter().all(|k| k.is_scalar_class()) {
            Some(Self::Scalar)
        } else if kinds.iter().all(|k| k.is_mapping_class()) {
            Some(Self::Mapping)
        } else if kinds.iter().all(|k| k.is_sequence_class()) {
            Some(Self::Sequence)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Mapping => f.write_str("mapping"),
            Self::Sequence => f.write_str("sequence"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_belongs_to_every_class() {
        assert!(ValueKind::Absent.is_scalar_class());
        assert!(ValueKind::Absent.is_mapping_class());
        assert!(ValueKind::Absent.is_sequence_class());
    }

    #[test]
    fn scalars_mix_with_null() {
        let cat = Category::common(ValueKind::Number, ValueKind::Null, ValueKind::String);
        assert_eq!(cat, Some(Category::Scalar));
    }

    #[test]
    fn mapping_with_absent_sides() {
        let cat = Category::common(ValueKind::Absent, ValueKind::Mapping, ValueKind::Absent);
        assert_eq!(cat, Some(Category::Mapping));
    }

    #[test]
    fn sequence_with_absent_root() {
        let cat = Category::common(ValueKind::Absent, ValueKind::Sequence, ValueKind::Sequence);
        assert_eq!(cat, Some(Category::Sequence));
    }

    #[test]
    fn mapping_null_sequence_has_no_category() {
        let cat = Category::common(ValueKind::Mapping, ValueKind::Null, ValueKind::Sequence);
        assert_eq!(cat, None);
    }

    #[test]
    fn mapping_and_scalar_do_not_mix() {
        let cat = Category::common(ValueKind::Mapping, ValueKind::Mapping, ValueKind::Number);
        assert_eq!(cat, None);
    }

    #[test]
    fn display_names() {
        assert_eq!(ValueKind::Sequence.to_string(), "sequence");
        assert_eq!(Category::Mapping.to_string(), "mapping");
    }
}
