use std::{collections::BTreeSet, mem};

use anyhow::{Result, bail};
use log::{debug, warn};

use crate::{
    Changeset, Move, Position,
    index_space::{close_gap, close_gap_or_drop, open_gap, remap, removed_in_gap},
};

/// Folds a stream of group and element mutations into one [`Changeset`] per batch.
///
/// Every mutation is expressed in the indices as they are right after the previous mutation.
/// Within one call, removals and updates refer to the state before the call, insertions to the
/// state after it.
///
/// Batches nest. Only the `end_batch()` that closes the outermost batch returns the accumulated
/// changeset.
#[derive(Debug, Default)]
pub struct ChangeReducer {
    depth: usize,
    accumulated: Changeset,
}

impl ChangeReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_batching(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn begin_batch(&mut self) {
        self.depth += 1;
        if self.depth == 1 {
            debug!("Batch started");
        }
    }

    /// Closes a batch.
    ///
    /// Returns the accumulated changeset and resets the reducer if this closed the outermost
    /// batch, `None` if batches are still open.
    ///
    /// Fails without touching the reducer if there is no open batch.
    pub fn end_batch(&mut self) -> Result<Option<Changeset>> {
        if self.depth == 0 {
            bail!("Unbalanced batch: end_batch() without a matching begin_batch()");
        }
        self.depth -= 1;
        if self.depth > 0 {
            return Ok(None);
        }

        let changeset = mem::take(&mut self.accumulated);
        debug!("Batch ended: {changeset}");
        Ok(Some(changeset))
    }

    pub fn insert_groups(&mut self, indices: impl IntoIterator<Item = usize>) {
        if !self.expect_batch("insert_groups") {
            return;
        }
        // Ascending, so that every index is already final when it is recorded.
        for index in sorted(indices) {
            self.insert_group(index);
        }
    }

    pub fn remove_groups(&mut self, indices: impl IntoIterator<Item = usize>) {
        if !self.expect_batch("remove_groups") {
            return;
        }
        // Descending, so that every index still refers to the state before the call.
        for index in sorted(indices).into_iter().rev() {
            self.remove_group(index);
        }
    }

    pub fn update_groups(&mut self, indices: impl IntoIterator<Item = usize>) {
        if !self.expect_batch("update_groups") {
            return;
        }
        for index in sorted(indices) {
            self.update_group(index);
        }
    }

    pub fn insert_elements(&mut self, positions: impl IntoIterator<Item = Position>) {
        if !self.expect_batch("insert_elements") {
            return;
        }
        for position in sorted(positions) {
            self.insert_element(position);
        }
    }

    pub fn remove_elements(&mut self, positions: impl IntoIterator<Item = Position>) {
        if !self.expect_batch("remove_elements") {
            return;
        }
        for position in sorted(positions).into_iter().rev() {
            self.remove_element(position);
        }
    }

    pub fn update_elements(&mut self, positions: impl IntoIterator<Item = Position>) {
        if !self.expect_batch("update_elements") {
            return;
        }
        for position in sorted(positions) {
            self.update_element(position);
        }
    }

    pub fn move_elements(&mut self, moves: impl IntoIterator<Item = Move>) {
        if !self.expect_batch("move_elements") {
            return;
        }
        for m in moves {
            if self.absorbs_elements_of(m.from.group) || self.absorbs_elements_of(m.to.group) {
                continue;
            }
            self.accumulated.elements_moved.insert(m);
        }
    }

    /// Mutations outside of a batch are not recorded, an idle reducer stays empty.
    fn expect_batch(&self, operation: &str) -> bool {
        if self.depth == 0 {
            warn!("{operation}() outside of a batch, ignored");
            return false;
        }
        true
    }

    fn insert_group(&mut self, index: usize) {
        let acc = &mut self.accumulated;
        let rank = index - acc.groups_inserted.range(..index).count();

        let shift = move |group| Some(open_gap(group, index));
        let shift_position = move |p: Position| p.with_group(open_gap(p.group, index));
        remap(&mut acc.groups_inserted, shift);
        remap(&mut acc.groups_updated, shift);
        remap(&mut acc.elements_inserted, |p| Some(shift_position(p)));
        remap(&mut acc.elements_updated, |p| Some(shift_position(p)));
        remap(&mut acc.elements_moved, |m| Some(m.map(shift_position)));

        // A group removed from the very same gap is replaced, which the view can express as a
        // reload of the surviving slot.
        match removed_in_gap(rank, acc.groups_removed.iter().copied()) {
            Some(replaced) => {
                acc.groups_removed.remove(&replaced);
                acc.groups_updated.insert(index);
            }
            None => {
                acc.groups_inserted.insert(index);
            }
        }
    }

    fn remove_group(&mut self, index: usize) {
        let acc = &mut self.accumulated;
        match acc.pre_batch_group(index) {
            Some(pre_batch) => {
                acc.groups_removed.insert(pre_batch);
                // The view removes the elements along with the group.
                acc.elements_removed.retain(|p| p.group != pre_batch);
            }
            // Inserted in this batch, the view never sees it.
            None => {
                acc.groups_inserted.remove(&index);
            }
        }

        let shift = move |group| close_gap_or_drop(group, index);
        let shift_position =
            move |p: Position| Some(p.with_group(close_gap_or_drop(p.group, index)?));
        remap(&mut acc.groups_inserted, shift);
        remap(&mut acc.groups_updated, shift);
        remap(&mut acc.elements_inserted, shift_position);
        remap(&mut acc.elements_updated, shift_position);
        remap(&mut acc.elements_moved, |m| {
            (m.from.group != index && m.to.group != index)
                .then(|| m.map(|p| p.with_group(close_gap(p.group, index))))
        });
    }

    fn update_group(&mut self, index: usize) {
        let acc = &mut self.accumulated;
        // Inserted groups are fresh anyway.
        let Some(pre_batch) = acc.pre_batch_group(index) else {
            return;
        };
        acc.groups_updated.insert(index);

        // The reload covers all elements of the group.
        acc.elements_removed.retain(|p| p.group != pre_batch);
        acc.elements_inserted.retain(|p| p.group != index);
        acc.elements_updated.retain(|p| p.group != index);
        acc.elements_moved.retain(|m| m.from.group != index && m.to.group != index);
    }

    fn insert_element(&mut self, position: Position) {
        if self.absorbs_elements_of(position.group) {
            return;
        }
        let acc = &mut self.accumulated;
        let shift = move |p: Position| {
            Some(if p.group == position.group {
                p.with_element(open_gap(p.element, position.element))
            } else {
                p
            })
        };
        remap(&mut acc.elements_inserted, shift);
        remap(&mut acc.elements_updated, shift);
        acc.elements_inserted.insert(position);
    }

    fn remove_element(&mut self, position: Position) {
        if self.absorbs_elements_of(position.group) {
            return;
        }
        let acc = &mut self.accumulated;
        // `None` if inserted in this batch, the view never sees it.
        if let Some(pre_batch) = acc.pre_batch_position(position) {
            acc.elements_removed.insert(pre_batch);
        }

        let shift = move |p: Position| {
            if p.group != position.group {
                return Some(p);
            }
            Some(p.with_element(close_gap_or_drop(p.element, position.element)?))
        };
        remap(&mut acc.elements_inserted, shift);
        remap(&mut acc.elements_updated, shift);
        remap(&mut acc.elements_moved, |m| {
            (m.from != position && m.to != position).then(|| {
                m.map(|p| {
                    if p.group == position.group {
                        p.with_element(close_gap(p.element, position.element))
                    } else {
                        p
                    }
                })
            })
        });
    }

    fn update_element(&mut self, position: Position) {
        if self.absorbs_elements_of(position.group)
            || self.accumulated.elements_inserted.contains(&position)
        {
            return;
        }
        self.accumulated.elements_updated.insert(position);
    }

    /// `true` if the group is inserted or reloaded as a whole, which covers changes to its
    /// elements.
    fn absorbs_elements_of(&self, group: usize) -> bool {
        self.accumulated.groups_inserted.contains(&group)
            || self.accumulated.groups_updated.contains(&group)
    }
}

fn sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> BTreeSet<T> {
    items.into_iter().collect()
}
