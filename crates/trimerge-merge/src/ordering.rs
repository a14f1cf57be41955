//! Order merge for identity-keyed sequences.
//!
//! Given a base order and an anchor order, [`merge_ordered_sets`] keeps the
//! anchor order exactly and reinserts every base-only element immediately
//! before the first anchor that followed it in the base order. Base-only
//! elements with no anchor after them go to the end.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Interleave `base`-only elements into `anchors`.
///
/// Both inputs are expected to be duplicate-free. Runs of base-only
/// elements keep their internal order, but two runs swap places when their
/// anchors do.
///
/// If `base` repeats an anchor, the runs preceding each occurrence are all
/// emitted, in base order, before that anchor. No base element is dropped.
///
/// # Examples
///
/// ```
/// use trimerge_merge::merge_ordered_sets;
///
/// let merged = merge_ordered_sets(&["a", "b", "c"], &["b", "d", "a"]);
/// assert_eq!(merged, ["b", "d", "a", "c"]);
/// ```
pub fn merge_ordered_sets<T>(base: &[T], anchors: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let anchor_set: HashSet<&T> = anchors.iter().collect();
    let mut before: HashMap<&T, Vec<T>> = HashMap::new();
    let mut unanchored = Vec::new();

    for item in base {
        if anchor_set.contains(item) {
            before
                .entry(item)
                .or_default()
                .extend(std::mem::take(&mut unanchored));
        } else {
            unanchored.push(item.clone());
        }
    }

    let mut result = Vec::with_capacity(base.len() + anchors.len());
    for anchor in anchors {
        if let Some(run) = before.remove(anchor) {
            result.extend(run);
        }
        result.push(anchor.clone());
    }
    result.extend(unanchored);
    result
}
