use std::collections::BTreeSet;

use sectioned_changes::{ChangeReducer, Changeset, Move, Position};

use crate::GroupConfiguration;

/// The data source as seen by the adapter.
pub trait GroupSource {
    fn group_count(&self) -> usize;
    /// The view configuration of `group` in the data source's current state.
    fn configuration(&self, group: usize) -> GroupConfiguration;
}

/// A structural change reported by the data source.
///
/// Removals and updates refer to the indices before the mutation, insertions to the indices after
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    InsertGroups(BTreeSet<usize>),
    RemoveGroups(BTreeSet<usize>),
    UpdateGroups(BTreeSet<usize>),
    InsertElements(BTreeSet<Position>),
    RemoveElements(BTreeSet<Position>),
    UpdateElements(BTreeSet<Position>),
    MoveElements(BTreeSet<Move>),
}

impl Mutation {
    /// Records the mutation in an open batch.
    pub fn fold_into(self, reducer: &mut ChangeReducer) {
        match self {
            Self::InsertGroups(indices) => reducer.insert_groups(indices),
            Self::RemoveGroups(indices) => reducer.remove_groups(indices),
            Self::UpdateGroups(indices) => reducer.update_groups(indices),
            Self::InsertElements(positions) => reducer.insert_elements(positions),
            Self::RemoveElements(positions) => reducer.remove_elements(positions),
            Self::UpdateElements(positions) => reducer.update_elements(positions),
            Self::MoveElements(moves) => reducer.move_elements(moves),
        }
    }

    /// The changeset of a batch that consists of this mutation only.
    pub fn into_changeset(self) -> Changeset {
        let mut changeset = Changeset::default();
        match self {
            Self::InsertGroups(indices) => changeset.groups_inserted = indices,
            Self::RemoveGroups(indices) => changeset.groups_removed = indices,
            Self::UpdateGroups(indices) => changeset.groups_updated = indices,
            Self::InsertElements(positions) => changeset.elements_inserted = positions,
            Self::RemoveElements(positions) => changeset.elements_removed = positions,
            Self::UpdateElements(positions) => changeset.elements_updated = positions,
            Self::MoveElements(moves) => changeset.elements_moved = moves,
        }
        changeset
    }
}

/// Everything the data source tells the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    BeginBatch,
    EndBatch,
    Mutation(Mutation),
    /// The data source changed in a way that cannot be described by mutations.
    Invalidate,
}

impl From<Mutation> for Notification {
    fn from(mutation: Mutation) -> Self {
        Self::Mutation(mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mutation_changeset_matches_a_reduced_batch() {
        let mutations = [
            Mutation::InsertGroups([0, 2].into()),
            Mutation::RemoveGroups([1, 3].into()),
            Mutation::UpdateElements([Position::new(0, 1)].into()),
            Mutation::MoveElements([Move::new((0, 0), (0, 1))].into()),
        ];

        for mutation in mutations {
            let mut reducer = ChangeReducer::new();
            reducer.begin_batch();
            mutation.clone().fold_into(&mut reducer);
            let reduced = reducer.end_batch().unwrap().unwrap();

            assert_eq!(mutation.into_changeset(), reduced);
        }
    }
}
