use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    /// Button that opens cells.
    pub const PRIMARY: Self = Self::LEFT;
    /// Button that toggles flags.
    pub const SECONDARY: Self = Self::RIGHT;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Press,
    Release,
    Enter,
    Leave,
}

/// Raw pointer event on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub coordinate: Coordinate,
    pub button: MouseButtons,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub const fn new(coordinate: Coordinate, button: MouseButtons, phase: PointerPhase) -> Self {
        Self {
            coordinate,
            button,
            phase,
        }
    }

    pub const fn press(coordinate: Coordinate, button: MouseButtons) -> Self {
        Self::new(coordinate, button, PointerPhase::Press)
    }

    pub const fn release(coordinate: Coordinate, button: MouseButtons) -> Self {
        Self::new(coordinate, button, PointerPhase::Release)
    }

    pub const fn enter(coordinate: Coordinate) -> Self {
        Self::new(coordinate, MouseButtons::empty(), PointerPhase::Enter)
    }

    pub const fn leave(coordinate: Coordinate) -> Self {
        Self::new(coordinate, MouseButtons::empty(), PointerPhase::Leave)
    }
}

/// Turns press/enter/release sequences into one [`ActionRequest`] per gesture.
///
/// The target is the last cell pressed or entered, so dragging before releasing moves the action along with the
/// pointer. The last two pressed buttons are kept; seeing primary and secondary together before a release makes the
/// gesture a chord.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionInterpreter {
    last_coordinate: Option<Coordinate>,
    prior_button: Option<MouseButtons>,
    current_button: Option<MouseButtons>,
}

impl ActionInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<ActionRequest> {
        use PointerPhase::*;

        let PointerEvent {
            coordinate,
            button,
            phase,
        } = event;

        match phase {
            Press => {
                self.last_coordinate = Some(coordinate);
                self.prior_button = self.current_button.replace(button);
                log::trace!("{} press ({:?})", coordinate, button);
                None
            }
            Enter => {
                self.last_coordinate = Some(coordinate);
                log::trace!("{} enter", coordinate);
                None
            }
            Leave => None,
            Release => self.finish_gesture(),
        }
    }

    fn finish_gesture(&mut self) -> Option<ActionRequest> {
        let prior = self.prior_button.take();
        let current = self.current_button.take();
        if prior.is_none() && current.is_none() {
            log::trace!("release without press, ignored");
            return None;
        }

        let coordinate = self.last_coordinate?;
        let primary = Some(MouseButtons::PRIMARY);
        let secondary = Some(MouseButtons::SECONDARY);
        let is_chord = (prior == primary && current == secondary)
            || (prior == secondary && current == primary);

        let kind = if is_chord {
            ActionKind::OpenNeighbours
        } else if current == secondary {
            ActionKind::ToggleFlag
        } else if current == primary {
            ActionKind::Open
        } else {
            log::trace!("no action for buttons {:?} then {:?}", prior, current);
            return None;
        };

        log::debug!("request {:?} at {}", kind, coordinate);
        Some(ActionRequest::new(coordinate, kind))
    }
}
