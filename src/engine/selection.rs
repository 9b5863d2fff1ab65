//! Interaction state: which square a player has picked and where it may go.
//!
//! Kept apart from `GameState` so the rules value never carries UI concerns.
//! A `Selection` is only meaningful against the state it was computed from;
//! drop it whenever that state is replaced.

use crate::engine::movegen::destinations;
use crate::engine::state::GameState;
use crate::engine::types::Square;

/// The currently highlighted piece, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected_square: Option<Square>,
    pub valid_moves: Vec<Square>,
}

/// What a click on the board asks the caller to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Replace the selection with this one.
    Selected(Selection),
    /// Drop the selection.
    Cleared,
    /// Commit a move; the selection should be dropped afterwards.
    Move { from: Square, to: Square },
    /// Nothing happens.
    Ignored,
}

impl Selection {
    /// Select the piece on `square` if it belongs to the side to move.
    pub fn select(state: &GameState, square: Square) -> Option<Selection> {
        let piece = state.board.get(square)?;
        if piece.color != state.turn {
            return None;
        }
        Some(Selection {
            selected_square: Some(square),
            valid_moves: destinations(&state.board, square, piece, &state.context()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.selected_square.is_none()
    }

    /// Resolve a click on `square`.
    ///
    /// Finished games ignore clicks. With a piece selected, a highlighted
    /// square becomes a move, another own piece moves the selection, and any
    /// other square clears it. With nothing selected, only own pieces react.
    pub fn click(&self, state: &GameState, square: Square) -> ClickOutcome {
        if state.is_game_over() {
            return ClickOutcome::Ignored;
        }

        match self.selected_square {
            Some(from) if self.valid_moves.contains(&square) => ClickOutcome::Move { from, to: square },
            Some(_) => match Selection::select(state, square) {
                Some(selection) => ClickOutcome::Selected(selection),
                None => ClickOutcome::Cleared,
            },
            None => match Selection::select(state, square) {
                Some(selection) => ClickOutcome::Selected(selection),
                None => ClickOutcome::Ignored,
            },
        }
    }
}
