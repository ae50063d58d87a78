use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// What a cell hides. Fixed once the grid is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Number of mines among the up to eight neighbours, `0` means empty.
    Adjacent(u8),
}

impl CellValue {
    pub const EMPTY: Self = Self::Adjacent(0);

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Adjacent(0))
    }
}

/// Player-visible state, the only part of a cell that changes during a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Closed,
    Opened,
    Flagged,
}

/// One grid square. Handed out by value, so listeners always see a snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coordinate: Coordinate,
    value: CellValue,
    state: CellState,
}

impl Cell {
    pub(crate) const fn new(coordinate: Coordinate, value: CellValue) -> Self {
        Self {
            coordinate,
            value,
            state: CellState::Closed,
        }
    }

    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub const fn value(&self) -> CellValue {
        self.value
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.state, CellState::Closed)
    }

    pub const fn is_opened(&self) -> bool {
        matches!(self.state, CellState::Opened)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn is_mine(&self) -> bool {
        self.value.is_mine()
    }

    pub(crate) fn open(&mut self) {
        self.state = CellState::Opened;
    }

    pub(crate) fn set_flag(&mut self, flagged: bool) {
        self.state = if flagged {
            CellState::Flagged
        } else {
            CellState::Closed
        };
    }
}
