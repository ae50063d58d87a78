use serde::{Deserialize, Serialize};

/// What a chord does once the flag count around the target matches its number.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordPolicy {
    /// Open every unflagged neighbour, flagged ones are trusted as-is.
    #[default]
    OpenUnflagged,
    /// Lose immediately if any of the flagged neighbours is actually safe.
    StrictFlags,
}

/// When a running game counts as won.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRule {
    /// Every safe cell has been opened.
    #[default]
    SafeCellsOpened,
    /// The flag budget is spent and every cell is either opened or flagged.
    AllCellsAccounted,
}

/// Gameplay variations a board is built with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub chord: ChordPolicy,
    pub win: WinRule,
    /// Refuse new flags once the budget reaches zero instead of letting it go negative.
    pub cap_flags: bool,
}
