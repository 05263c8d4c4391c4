use std::{collections::BTreeSet, fmt};

use itertools::Itertools;

use crate::{
    Move, Position,
    index_space::{nth_survivor, remap},
};

/// All changes of one batch, ready to be handed to a list view's batch update.
///
/// Removals are expressed in indices from before the batch. Insertions and updates are expressed in
/// indices after the batch: after all removals and insertions have been applied. Moves are
/// recorded as they were reported and renumbered along with group changes.
///
/// Because the two kinds live in different index spaces, the same number may show up in both
/// `groups_removed` and `groups_inserted` (or `elements_removed` and `elements_inserted`). Removing
/// `a` and `c` from `[a, b, c, d, e]` and then inserting `x` between `d` and `e` yields removed
/// `{0, 2}` and inserted `{2}`: the old `c` and the new `x` are different slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    pub groups_inserted: BTreeSet<usize>,
    pub groups_removed: BTreeSet<usize>,
    pub groups_updated: BTreeSet<usize>,
    pub elements_inserted: BTreeSet<Position>,
    pub elements_removed: BTreeSet<Position>,
    pub elements_updated: BTreeSet<Position>,
    pub elements_moved: BTreeSet<Move>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0
    }

    /// The number of individual group and element operations.
    pub fn operation_count(&self) -> usize {
        self.groups_inserted.len()
            + self.groups_removed.len()
            + self.groups_updated.len()
            + self.elements_inserted.len()
            + self.elements_removed.len()
            + self.elements_updated.len()
            + self.elements_moved.len()
    }

    /// Maps a group index after the batch to its index before the batch.
    ///
    /// Returns `None` if the group was inserted.
    pub fn pre_batch_group(&self, group: usize) -> Option<usize> {
        if self.groups_inserted.contains(&group) {
            return None;
        }
        let rank = group - self.groups_inserted.range(..group).count();
        Some(nth_survivor(rank, self.groups_removed.iter().copied()))
    }

    /// Maps an element position after the batch to its position before the batch.
    ///
    /// Returns `None` if the element or its group was inserted.
    pub fn pre_batch_position(&self, position: Position) -> Option<Position> {
        let group = self.pre_batch_group(position.group)?;
        if self.elements_inserted.contains(&position) {
            return None;
        }
        let inserted_before = self
            .elements_inserted
            .range(Position::new(position.group, 0)..position)
            .count();
        let removed = self
            .elements_removed
            .range(Position::group_range(group))
            .map(|p| p.element);
        Some(Position::new(
            group,
            nth_survivor(position.element - inserted_before, removed),
        ))
    }

    /// Rewrites every update into a removal of the original and an insertion at the same final
    /// slot.
    ///
    /// For views that refuse to reload a slot in the same transaction that removes or inserts
    /// around it.
    pub fn into_replacements(self) -> Self {
        // Resolve against the unmodified changeset, every replacement shifts the ranks.
        let groups: Vec<_> = self
            .groups_updated
            .iter()
            .filter_map(|&group| Some((group, self.pre_batch_group(group)?)))
            .collect();
        let elements: Vec<_> = self
            .elements_updated
            .iter()
            .filter_map(|&position| Some((position, self.pre_batch_position(position)?)))
            .collect();

        let mut replaced = Self {
            groups_updated: BTreeSet::new(),
            elements_updated: BTreeSet::new(),
            ..self
        };

        for (group, pre_batch) in groups {
            replaced.groups_removed.insert(pre_batch);
            replaced.groups_inserted.insert(group);
            // The group is replaced as a whole.
            remap(&mut replaced.elements_removed, |p| {
                (p.group != pre_batch).then_some(p)
            });
        }
        for (position, pre_batch) in elements {
            replaced.elements_removed.insert(pre_batch);
            replaced.elements_inserted.insert(position);
        }
        replaced
    }
}

impl fmt::Display for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no changes");
        }

        let sections = [
            ("groups removed", self.groups_removed.iter().join(", ")),
            ("groups inserted", self.groups_inserted.iter().join(", ")),
            ("groups updated", self.groups_updated.iter().join(", ")),
            ("elements removed", self.elements_removed.iter().join(", ")),
            ("elements inserted", self.elements_inserted.iter().join(", ")),
            ("elements updated", self.elements_updated.iter().join(", ")),
            ("elements moved", self.elements_moved.iter().join(", ")),
        ];

        let text = sections
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(label, entries)| format!("{label}: [{entries}]"))
            .join("; ");
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(list: &[(usize, usize)]) -> BTreeSet<Position> {
        list.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn empty_changeset() {
        let changeset = Changeset::default();
        assert!(changeset.is_empty());
        assert_eq!(changeset.operation_count(), 0);
        assert_eq!(changeset.to_string(), "no changes");
    }

    #[test]
    fn pre_batch_group_skips_insertions_and_removals() {
        let changeset = Changeset {
            groups_inserted: [0].into(),
            groups_removed: [1].into(),
            ..Default::default()
        };

        assert_eq!(changeset.pre_batch_group(0), None);
        // Final 1 is the first survivor, which is pre-batch 0.
        assert_eq!(changeset.pre_batch_group(1), Some(0));
        // Final 2 is the second survivor, pre-batch 1 is gone.
        assert_eq!(changeset.pre_batch_group(2), Some(2));
    }

    #[test]
    fn pre_batch_position_follows_its_group() {
        let changeset = Changeset {
            groups_inserted: [0].into(),
            elements_inserted: positions(&[(1, 0)]),
            elements_removed: positions(&[(0, 0)]),
            ..Default::default()
        };

        assert_eq!(changeset.pre_batch_position(Position::new(0, 3)), None);
        assert_eq!(changeset.pre_batch_position(Position::new(1, 0)), None);
        assert_eq!(
            changeset.pre_batch_position(Position::new(1, 1)),
            Some(Position::new(0, 1))
        );
    }

    #[test]
    fn replacements_resolve_against_the_original() {
        let changeset = Changeset {
            elements_removed: positions(&[(0, 0)]),
            elements_updated: positions(&[(0, 0), (0, 1)]),
            ..Default::default()
        };

        let replaced = changeset.into_replacements();

        assert!(replaced.elements_updated.is_empty());
        assert_eq!(replaced.elements_removed, positions(&[(0, 0), (0, 1), (0, 2)]));
        assert_eq!(replaced.elements_inserted, positions(&[(0, 0), (0, 1)]));
    }

    #[test]
    fn group_replacement_drops_its_element_removals() {
        let changeset = Changeset {
            groups_updated: [1].into(),
            elements_removed: positions(&[(1, 2), (2, 0)]),
            ..Default::default()
        };

        let replaced = changeset.into_replacements();

        assert_eq!(replaced.groups_removed, [1].into());
        assert_eq!(replaced.groups_inserted, [1].into());
        assert_eq!(replaced.elements_removed, positions(&[(2, 0)]));
    }

    #[test]
    fn display_lists_non_empty_sections() {
        let changeset = Changeset {
            groups_removed: [1, 2].into(),
            elements_moved: [Move::new((0, 0), (0, 2))].into(),
            ..Default::default()
        };

        assert_eq!(
            changeset.to_string(),
            "groups removed: [1, 2]; elements moved: [(0, 0) -> (0, 2)]"
        );
    }
}
