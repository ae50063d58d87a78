use serde::{Deserialize, Serialize};

use crate::Cell;

/// Notification emitted by a board, in the order the changes happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum BoardEvent {
    GameStarted,
    CellOpened(Cell),
    CellFlagged(Cell),
    CellUnflagged(Cell),
    /// A flag sitting on a safe cell, reported once when the game is lost.
    CellFlaggedIncorrectly(Cell),
    FlagBudgetChanged(i32),
    GameWon,
    GameLost,
}

impl BoardEvent {
    /// The cell this notification is about, if any.
    pub const fn cell(&self) -> Option<&Cell> {
        use BoardEvent::*;
        match self {
            CellOpened(cell) | CellFlagged(cell) | CellUnflagged(cell) | CellFlaggedIncorrectly(cell) => {
                Some(cell)
            }
            GameStarted | FlagBudgetChanged(_) | GameWon | GameLost => None,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::GameWon | Self::GameLost)
    }
}

/// Receiver of board notifications, registered on a [`crate::GameSession`].
pub trait BoardListener {
    fn on_event(&mut self, event: &BoardEvent);
}

impl<F> BoardListener for F
where
    F: FnMut(&BoardEvent),
{
    fn on_event(&mut self, event: &BoardEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let json = serde_json::to_string(&BoardEvent::FlagBudgetChanged(-1)).unwrap();
        assert_eq!(json, r#"{"event":"flag_budget_changed","data":-1}"#);

        let json = serde_json::to_string(&BoardEvent::GameWon).unwrap();
        assert_eq!(json, r#"{"event":"game_won"}"#);
    }

    #[test]
    fn cell_accessor_only_for_cell_events() {
        let cell = Cell::new(Coordinate::new(0, 1), CellValue::EMPTY);
        assert_eq!(BoardEvent::CellOpened(cell).cell(), Some(&cell));
        assert_eq!(BoardEvent::GameLost.cell(), None);
        assert!(BoardEvent::GameLost.is_terminal());
        assert!(!BoardEvent::GameStarted.is_terminal());
    }
}
