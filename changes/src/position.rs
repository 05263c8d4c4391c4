use std::ops::RangeInclusive;

use derive_more::{Display, From};

/// The location of an element: its group and its offset inside that group.
///
/// Positions order lexicographically by group first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, From, Display)]
#[display("({group}, {element})")]
pub struct Position {
    pub group: usize,
    pub element: usize,
}

impl Position {
    pub const fn new(group: usize, element: usize) -> Self {
        Self { group, element }
    }

    /// All positions that belong to `group`.
    pub(crate) fn group_range(group: usize) -> RangeInclusive<Position> {
        Self::new(group, 0)..=Self::new(group, usize::MAX)
    }

    pub(crate) fn with_group(self, group: usize) -> Self {
        Self { group, ..self }
    }

    pub(crate) fn with_element(self, element: usize) -> Self {
        Self { element, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{from} -> {to}")]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: impl Into<Position>, to: impl Into<Position>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub(crate) fn map(self, f: impl Fn(Position) -> Position) -> Self {
        Self {
            from: f(self.from),
            to: f(self.to),
        }
    }
}
