use std::collections::BTreeSet;

use anyhow::Result;
use sectioned_changes::{Changeset, Move, Position};

/// The native list view as seen by the adapter.
pub trait ListView {
    /// Applies all operations as one transaction.
    ///
    /// An error means the view rejected the transaction and its state is undefined until the next
    /// [`ListView::reload_data`].
    fn perform_batch_updates(
        &mut self,
        operations: &[ViewOperation],
        animated: bool,
    ) -> Result<()>;

    /// Discards everything and reloads from the data source.
    fn reload_data(&mut self);
}

/// One step of a batch update transaction.
///
/// Deletions use indices from before the transaction, insertions and reloads indices after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOperation {
    DeleteGroups(BTreeSet<usize>),
    DeleteElements(BTreeSet<Position>),
    InsertGroups(BTreeSet<usize>),
    InsertElements(BTreeSet<Position>),
    ReloadGroups(BTreeSet<usize>),
    ReloadElements(BTreeSet<Position>),
    MoveElement(Move),
}

impl ViewOperation {
    /// Orders a changeset into the sequence list views require: removals, insertions, reloads,
    /// then moves, groups before elements. Empty steps are skipped.
    pub fn sequence(changeset: Changeset) -> Vec<ViewOperation> {
        let Changeset {
            groups_inserted,
            groups_removed,
            groups_updated,
            elements_inserted,
            elements_removed,
            elements_updated,
            elements_moved,
        } = changeset;

        let steps = [
            non_empty(groups_removed).map(Self::DeleteGroups),
            non_empty(elements_removed).map(Self::DeleteElements),
            non_empty(groups_inserted).map(Self::InsertGroups),
            non_empty(elements_inserted).map(Self::InsertElements),
            non_empty(groups_updated).map(Self::ReloadGroups),
            non_empty(elements_updated).map(Self::ReloadElements),
        ];

        steps
            .into_iter()
            .flatten()
            .chain(elements_moved.into_iter().map(Self::MoveElement))
            .collect()
    }
}

fn non_empty<T>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    (!set.is_empty()).then_some(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_orders_removals_first() {
        let changeset = Changeset {
            groups_inserted: [0].into(),
            groups_removed: [2].into(),
            elements_updated: [Position::new(1, 1)].into(),
            elements_removed: [Position::new(0, 3)].into(),
            elements_moved: [Move::new((1, 0), (1, 2))].into(),
            ..Default::default()
        };

        assert_eq!(
            ViewOperation::sequence(changeset),
            vec![
                ViewOperation::DeleteGroups([2].into()),
                ViewOperation::DeleteElements([Position::new(0, 3)].into()),
                ViewOperation::InsertGroups([0].into()),
                ViewOperation::ReloadElements([Position::new(1, 1)].into()),
                ViewOperation::MoveElement(Move::new((1, 0), (1, 2))),
            ]
        );
    }

    #[test]
    fn empty_changeset_has_no_operations() {
        assert!(ViewOperation::sequence(Changeset::default()).is_empty());
    }
}
