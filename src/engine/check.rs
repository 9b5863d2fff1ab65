//! Check, checkmate and stalemate detection.
//!
//! Attacks are tested geometrically against the current board. Pawns are
//! tested by their capture diagonal directly; every other piece reuses the
//! move-validity rules under `MoveContext::NONE`, so the attack test never
//! consults castling rights or king safety and cannot recurse.

use crate::engine::board::Board;
use crate::engine::movegen::{has_legal_move, is_valid_move};
use crate::engine::types::{Color, MoveContext, Piece, PieceType, Position};

/// Is `target` attacked by any piece of colour `by`?
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(sq, piece)| attacks(board, sq.position(), target, piece))
}

/// Is `color`'s king attacked? A board without that king reports `false`.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king.position(), !color),
        None => false,
    }
}

/// In check with no legal move.
pub fn is_checkmate(board: &Board, color: Color, ctx: &MoveContext) -> bool {
    is_king_in_check(board, color) && !has_legal_move(board, color, ctx)
}

/// Not in check, yet no legal move.
pub fn is_stalemate(board: &Board, color: Color, ctx: &MoveContext) -> bool {
    !is_king_in_check(board, color) && !has_legal_move(board, color, ctx)
}

fn attacks(board: &Board, from: Position, target: Position, piece: Piece) -> bool {
    match piece.kind {
        PieceType::Pawn => {
            let d_row = target.row as i8 - from.row as i8;
            d_row == piece.color.pawn_direction() && from.col.abs_diff(target.col) == 1
        }
        _ => is_valid_move(board, from, target, piece, &MoveContext::NONE),
    }
}
