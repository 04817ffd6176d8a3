//! Utils

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// Remove duplicate entries, keeping the first occurrence of each value.
pub fn distinct_entries<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert(item.clone()) {
            out.push(item.clone());
        }
    }

    out
}

/// Index entries by key; later entries win.
pub fn extract_key<T: Clone, K: Eq + Hash>(
    items: &[T],
    key_fn: impl Fn(&T) -> K,
) -> FxHashMap<K, T> {
    items
        .iter()
        .map(|item| (key_fn(item), item.clone()))
        .collect()
}

/// Copy of `items` with the entry at `index` replaced by `value`.
///
/// Returns `None` when `index` is out of bounds.
pub fn replace_at<T: Clone>(items: &[T], value: T, index: usize) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }

    let mut out = items.to_vec();

    if let Some(slot) = out.get_mut(index) {
        *slot = value;
    }

    Some(out)
}

/// Copy of `items` without the entry at `index`; unchanged when out of bounds.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_entries_keeps_first_occurrence_order() {
        assert_eq!(distinct_entries(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(distinct_entries::<u8>(&[]).is_empty());
    }

    #[test]
    fn extract_key_indexes_by_key() {
        let map = extract_key(&[("a", 1), ("b", 2), ("a", 3)], |(k, _)| *k);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&("a", 3)));
    }

    #[test]
    fn replace_at_rejects_out_of_bounds() {
        assert_eq!(replace_at(&[1, 2, 3], 9, 1), Some(vec![1, 9, 3]));
        assert_eq!(replace_at(&[1, 2, 3], 9, 3), None);
        assert_eq!(replace_at::<u8>(&[], 9, 0), None);
    }

    #[test]
    fn remove_at_ignores_out_of_bounds() {
        assert_eq!(remove_at(&[1, 2, 3], 0), vec![2, 3]);
        assert_eq!(remove_at(&[1, 2, 3], 5), vec![1, 2, 3]);
    }
}
