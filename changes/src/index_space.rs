//! Index arithmetic shared by the reducer and the changeset.
//!
//! While a batch is open, surviving items never change their relative order. An item that is not
//! new in the batch can therefore be identified by its rank among the survivors, and that rank
//! maps back to its index before the batch by skipping over everything removed so far.
use std::{cmp::Ordering, collections::BTreeSet, mem};

/// Returns the `rank`-th index (zero based) that is not contained in `removed`.
///
/// `removed` must be ascending.
pub fn nth_survivor(rank: usize, removed: impl IntoIterator<Item = usize>) -> usize {
    let mut index = rank;
    for removed in removed {
        if removed > index {
            break;
        }
        index += 1;
    }
    index
}

/// Returns the first index in `removed` that sat directly before the survivor with `rank`, i.e. in
/// the gap between survivor `rank - 1` and survivor `rank`.
///
/// `removed` must be ascending.
pub fn removed_in_gap(rank: usize, removed: impl IntoIterator<Item = usize>) -> Option<usize> {
    removed
        .into_iter()
        .enumerate()
        .find(|&(preceding, index)| index - preceding == rank)
        .map(|(_, index)| index)
}

/// Moves `index` up by one if an insertion at `at` pushes it away.
pub fn open_gap(index: usize, at: usize) -> usize {
    if index >= at { index + 1 } else { index }
}

/// Moves `index` down by one if it follows a removal at `at`.
pub fn close_gap(index: usize, at: usize) -> usize {
    if index > at { index - 1 } else { index }
}

/// Like [`close_gap`], but `None` for the removed index itself.
pub fn close_gap_or_drop(index: usize, at: usize) -> Option<usize> {
    match index.cmp(&at) {
        Ordering::Less => Some(index),
        Ordering::Equal => None,
        Ordering::Greater => Some(index - 1),
    }
}

/// Rebuilds `set` by mapping every entry, dropping the ones `f` returns `None` for.
pub fn remap<T: Ord>(set: &mut BTreeSet<T>, f: impl FnMut(T) -> Option<T>) {
    *set = mem::take(set).into_iter().filter_map(f).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_survivor_skips_removed() {
        assert_eq!(nth_survivor(0, []), 0);
        assert_eq!(nth_survivor(0, [0]), 1);
        assert_eq!(nth_survivor(1, [1, 2]), 3);
        assert_eq!(nth_survivor(1, [0, 5]), 2);
        assert_eq!(nth_survivor(3, [5]), 3);
    }

    #[test]
    fn removed_in_gap_matches_survivor_rank() {
        // Survivors 0, 1, 3, 5: removed 2 sits before rank 2, removed 4 before rank 3.
        assert_eq!(removed_in_gap(2, [2, 4]), Some(2));
        assert_eq!(removed_in_gap(3, [2, 4]), Some(4));
        assert_eq!(removed_in_gap(0, [2, 4]), None);
        // Adjacent removals share a gap, the first one wins.
        assert_eq!(removed_in_gap(1, [1, 2]), Some(1));
    }

    #[test]
    fn gaps() {
        assert_eq!(open_gap(2, 2), 3);
        assert_eq!(open_gap(1, 2), 1);
        assert_eq!(close_gap(2, 2), 2);
        assert_eq!(close_gap(3, 2), 2);
        assert_eq!(close_gap_or_drop(2, 2), None);
        assert_eq!(close_gap_or_drop(1, 2), Some(1));
    }

    #[test]
    fn remap_drops_and_shifts() {
        let mut set: BTreeSet<usize> = [0, 1, 2, 3].into();
        remap(&mut set, |i| close_gap_or_drop(i, 1));
        assert_eq!(set, [0, 1, 2].into());
    }
}
