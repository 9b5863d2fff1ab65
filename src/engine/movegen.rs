//! Legal move generation.
//!
//! Pipeline:
//!   1. Test each of the 64 destinations against the piece's geometry and
//!      obstruction rules (`is_valid_move`, pseudo-legal).
//!   2. Filter: apply the move to a copy of the board and drop it if the
//!      mover's own king is left in check.
//!
//! Destinations come back in board scan order (a8, b8, … h1). The hint
//! advisor breaks ties on that order, so it must not change.

use crate::engine::board::{Board, castling_rook_squares, en_passant_victim};
use crate::engine::check::{is_king_in_check, is_square_attacked};
use crate::engine::types::{
    CastleSide, ChessError, Color, MoveContext, MoveKind, Piece, PieceType, Position, Square,
};

// =========================================================================
// Public API
// =========================================================================

/// Legal destinations for the piece standing on `square`.
///
/// An empty list means the piece has no legal move; an empty square is an
/// error.
pub fn get_valid_moves(
    board: &Board,
    square: Square,
    ctx: &MoveContext,
) -> Result<Vec<Square>, ChessError> {
    let piece = board.get(square).ok_or(ChessError::NoPieceAtSquare(square))?;
    Ok(destinations(board, square, piece, ctx))
}

/// Every legal `(from, to)` pair for `color`, pieces in scan order and each
/// piece's destinations in scan order.
pub fn legal_moves(board: &Board, color: Color, ctx: &MoveContext) -> Vec<(Square, Square)> {
    board
        .pieces_of(color)
        .flat_map(|(from, piece)| {
            destinations(board, from, piece, ctx)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Whether `color` has at least one legal move. Stops at the first one found.
pub fn has_legal_move(board: &Board, color: Color, ctx: &MoveContext) -> bool {
    board.pieces_of(color).any(|(from, piece)| {
        let from_pos = from.position();
        Square::all().any(|to| {
            is_valid_move(board, from_pos, to.position(), piece, ctx)
                && !leaves_king_in_check(board, from, to, piece)
        })
    })
}

/// Pseudo-legal test of a single destination.
///
/// Checks that `to` is on the board, that it does not hold a piece of the
/// mover's colour, and the per-type geometry and path rules. King safety is
/// not considered here.
pub fn is_valid_move(
    board: &Board,
    from: Position,
    to: Position,
    piece: Piece,
    ctx: &MoveContext,
) -> bool {
    if !to.is_on_board() {
        return false;
    }
    if board.at(to).is_some_and(|target| target.color == piece.color) {
        return false;
    }

    let d_row = to.row as i8 - from.row as i8;
    let d_col = to.col as i8 - from.col as i8;
    let (abs_row, abs_col) = (d_row.abs(), d_col.abs());

    match piece.kind {
        PieceType::Pawn => is_valid_pawn_move(board, from, to, piece.color, ctx),
        PieceType::Knight => (abs_row, abs_col) == (2, 1) || (abs_row, abs_col) == (1, 2),
        PieceType::Bishop => abs_row == abs_col && is_path_clear(board, from, to),
        PieceType::Rook => (d_row == 0) != (d_col == 0) && is_path_clear(board, from, to),
        PieceType::Queen => {
            (abs_row == abs_col || (d_row == 0) != (d_col == 0)) && is_path_clear(board, from, to)
        }
        PieceType::King => {
            (abs_row <= 1 && abs_col <= 1) || castle_side(board, from, to, piece.color, ctx).is_some()
        }
    }
}

/// Walk unit steps from `from` toward `to`, both exclusive, and report
/// whether every square passed is empty.
pub fn is_path_clear(board: &Board, from: Position, to: Position) -> bool {
    let row_dir = (to.row as i8 - from.row as i8).signum();
    let col_dir = (to.col as i8 - from.col as i8).signum();

    let mut current = from.offset(row_dir, col_dir);
    while let Some(pos) = current {
        if pos == to {
            return true;
        }
        if !board.is_empty(pos) {
            return false;
        }
        current = pos.offset(row_dir, col_dir);
    }
    true
}

/// Determine what kind of move `from → to` is for a move already known to be
/// valid. Promotions default to a queen; the caller may substitute another
/// choice.
pub fn classify_move(board: &Board, from: Square, to: Square, piece: Piece) -> MoveKind {
    match piece.kind {
        PieceType::King if from.col().abs_diff(to.col()) == 2 => MoveKind::Castle {
            side: if to.col() > from.col() {
                CastleSide::King
            } else {
                CastleSide::Queen
            },
        },
        PieceType::Pawn if from.col() != to.col() && board.get(to).is_none() => {
            MoveKind::EnPassant
        }
        PieceType::Pawn if to.row() == piece.color.promotion_row() => MoveKind::Promotion {
            choice: PieceType::Queen,
        },
        _ => MoveKind::Normal,
    }
}

// =========================================================================
// Internal helpers
// =========================================================================

/// Legal destinations for a known piece on `from`.
pub(crate) fn destinations(
    board: &Board,
    from: Square,
    piece: Piece,
    ctx: &MoveContext,
) -> Vec<Square> {
    let from_pos = from.position();
    Square::all()
        .filter(|&to| is_valid_move(board, from_pos, to.position(), piece, ctx))
        .filter(|&to| !leaves_king_in_check(board, from, to, piece))
        .collect()
}

fn leaves_king_in_check(board: &Board, from: Square, to: Square, piece: Piece) -> bool {
    let kind = classify_move(board, from, to, piece);
    let next = board.apply(from, to, kind);
    is_king_in_check(&next, piece.color)
}

fn is_valid_pawn_move(
    board: &Board,
    from: Position,
    to: Position,
    color: Color,
    ctx: &MoveContext,
) -> bool {
    let dir = color.pawn_direction();
    let d_row = to.row as i8 - from.row as i8;
    let abs_col = from.col.abs_diff(to.col);

    if abs_col == 0 {
        // Single push.
        if d_row == dir && board.is_empty(to) {
            return true;
        }
        // Double push from the starting row.
        if from.row == color.pawn_row() && d_row == 2 * dir && board.is_empty(to) {
            return from
                .offset(dir, 0)
                .is_some_and(|mid| board.is_empty(mid));
        }
        return false;
    }

    if abs_col == 1 && d_row == dir {
        if board.at(to).is_some() {
            // Own pieces were already rejected, so this is an enemy.
            return true;
        }
        let to_sq = Square::from_position(to);
        if ctx.en_passant == Some(to_sq) {
            let victim = en_passant_victim(Square::from_position(from), to_sq);
            return board.get(victim) == Some(Piece::new(PieceType::Pawn, !color));
        }
    }

    false
}

/// Which side a king move `from → to` castles to, if it is a permitted
/// castling move.
fn castle_side(
    board: &Board,
    from: Position,
    to: Position,
    color: Color,
    ctx: &MoveContext,
) -> Option<CastleSide> {
    let row = color.back_row();
    if from != (Position { row, col: 4 }) || to.row != row {
        return None;
    }
    let side = match to.col {
        6 => CastleSide::King,
        2 => CastleSide::Queen,
        _ => return None,
    };
    if !ctx.castling.allows(color, side) {
        return None;
    }

    let (rook_sq, _) = castling_rook_squares(row, side);
    if board.get(rook_sq) != Some(Piece::new(PieceType::Rook, color)) {
        return None;
    }

    let (between, crossed) = match side {
        CastleSide::King => (5..=6, 5),
        CastleSide::Queen => (1..=3, 3),
    };
    if between
        .into_iter()
        .any(|col| !board.is_empty(Position { row, col }))
    {
        return None;
    }

    // The landing square is covered by the self-check filter.
    if is_square_attacked(board, from, !color)
        || is_square_attacked(board, Position { row, col: crossed }, !color)
    {
        return None;
    }

    Some(side)
}

// =========================================================================
// Tests
// =========================================================================
