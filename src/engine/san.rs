//! Simplified algebraic notation.
//!
//! Examples: `e4`, `exd5`, `Nf3`, `Bxe5`, `O-O`, `e8=Q`. There is no
//! disambiguation between like pieces and no `+`/`#` suffix; callers that
//! want a status marker read it from the resulting state instead.

use crate::engine::board::Board;
use crate::engine::types::{CastleSide, Move, MoveKind, PieceType};

/// Render `mv` as played on `board` (the position *before* the move).
pub fn move_notation(mv: &Move, board: &Board) -> String {
    debug_assert_eq!(
        board.get(mv.from),
        Some(mv.piece),
        "move piece must stand on its origin square"
    );

    if let MoveKind::Castle { side } = mv.kind {
        return match side {
            CastleSide::King => "O-O".into(),
            CastleSide::Queen => "O-O-O".into(),
        };
    }

    let mut san = String::with_capacity(8);

    if mv.piece.kind == PieceType::Pawn {
        if mv.is_capture() {
            san.push(mv.from.file_char());
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());

        if let Some(promo) = mv.promotion() {
            san.push('=');
            san.push(promo.letter());
        }
    } else {
        san.push(mv.piece.kind.letter());
        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
    }

    san
}
