//! Coalescing of fine-grained list mutations into one batch update.
//!
//! A sectioned list view accepts a whole batch of changes in a single transaction, but only if the
//! changes are expressed in the index spaces it expects: removals against the state before the
//! batch, insertions and reloads against the state after it. Mutations, however, arrive one at a
//! time, each expressed against the state left behind by the previous one.
//!
//! The [`ChangeReducer`] folds such a stream into a [`Changeset`], renumbering everything it has
//! recorded so far whenever a new mutation shifts indices around.
mod changeset;
mod index_space;
mod position;
mod reducer;

pub use changeset::Changeset;
pub use position::{Move, Position};
pub use reducer::ChangeReducer;
