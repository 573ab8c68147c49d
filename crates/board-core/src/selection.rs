//! Click-to-move selection state.

use shakmaty::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(Square),
}

/// What a click should do, given the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Select(Square),
    Deselect,
    AttemptMove { from: Square, to: Square },
    Ignore,
}

impl Selection {
    /// `own_piece` is whether `square` holds a piece of the side to move.
    /// Once a square is selected every other click is a move attempt; legality
    /// is decided by whoever plays it.
    pub fn on_click(self, square: Square, own_piece: bool) -> ClickAction {
        match self {
            Selection::Unselected if own_piece => ClickAction::Select(square),
            Selection::Unselected => ClickAction::Ignore,
            Selection::Selected(origin) if origin == square => ClickAction::Deselect,
            Selection::Selected(origin) => ClickAction::AttemptMove {
                from: origin,
                to: square,
            },
        }
    }

    pub fn square(self) -> Option<Square> {
        match self {
            Selection::Selected(sq) => Some(sq),
            Selection::Unselected => None,
        }
    }
}
