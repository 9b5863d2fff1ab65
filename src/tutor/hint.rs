//! Rule-of-thumb move advice.
//!
//! A fixed ladder of heuristics, first match wins:
//!   1. answer a check
//!   2. rescue a threatened piece
//!   3. take the most valuable capturable piece
//!   4. develop a back-rank knight or bishop
//!   5. play to a centre square
//!   6. general advice
//!
//! Nothing here searches ahead; every rung reads the legal-move lists of the
//! current position only. Ties resolve in board scan order.

use std::cmp::Reverse;

use crate::engine::board::Board;
use crate::engine::movegen::{destinations, legal_moves};
use crate::engine::state::GameState;
use crate::engine::types::{Color, MoveContext, Piece, PieceType, Square};

const CENTER: [&str; 4] = ["e4", "d4", "e5", "d5"];

/// Which rung of the ladder produced a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintKind {
    CheckResponse,
    Threatened,
    Capture,
    Development,
    CenterControl,
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecommendedMove {
    pub from: Square,
    pub to: Square,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hint {
    pub kind: HintKind,
    pub suggestion: String,
    pub explanation: String,
    pub recommended_move: Option<RecommendedMove>,
}

/// Material scale used to rank captures. The king is worth nothing here.
pub const fn hint_value(kind: PieceType) -> u8 {
    match kind {
        PieceType::Pawn => 1,
        PieceType::Knight | PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Queen => 9,
        PieceType::King => 0,
    }
}

/// Advice for the side to move. Pure: reads `state` and nothing else.
pub fn generate_hint(state: &GameState) -> Hint {
    if state.check {
        return Hint {
            kind: HintKind::CheckResponse,
            suggestion: "Your king is in check!".into(),
            explanation: "You must immediately address the threat. Move your king to safety, \
                          block the attacking piece, or capture it."
                .into(),
            recommended_move: None,
        };
    }

    let ctx = state.context();
    let own = own_moves(&state.board, state.turn, &ctx);

    threatened_piece(&state.board, state.turn, &ctx, &own)
        .or_else(|| best_capture(&state.board, &own))
        .or_else(|| development(state.turn, &own))
        .or_else(|| center_control(&own))
        .unwrap_or_else(|| Hint {
            kind: HintKind::General,
            suggestion: "Think strategically".into(),
            explanation: "Look for ways to improve your piece positions, control key squares, \
                          and create threats against your opponent."
                .into(),
            recommended_move: None,
        })
}

/// A piece of the side to move with its legal destinations.
struct Candidate {
    square: Square,
    piece: Piece,
    moves: Vec<Square>,
}

fn own_moves(board: &Board, color: Color, ctx: &MoveContext) -> Vec<Candidate> {
    board
        .pieces_of(color)
        .map(|(square, piece)| Candidate {
            square,
            piece,
            moves: destinations(board, square, piece, ctx),
        })
        .collect()
}

fn threatened_piece(
    board: &Board,
    color: Color,
    ctx: &MoveContext,
    own: &[Candidate],
) -> Option<Hint> {
    let mut attacked = [false; 64];
    for (_, to) in legal_moves(board, !color, ctx) {
        attacked[to.index()] = true;
    }

    let target = own
        .iter()
        .find(|c| c.piece.kind != PieceType::King && attacked[c.square.index()])?;

    Some(Hint {
        kind: HintKind::Threatened,
        suggestion: format!(
            "Your {} on {} is under attack!",
            target.piece.kind, target.square
        ),
        explanation: "Consider moving this piece to safety or defending it with another piece."
            .into(),
        recommended_move: target.moves.first().map(|&to| RecommendedMove {
            from: target.square,
            to,
        }),
    })
}

fn best_capture(board: &Board, own: &[Candidate]) -> Option<Hint> {
    let mut captures: Vec<(&Candidate, Square, Piece)> = own
        .iter()
        .flat_map(|c| {
            c.moves
                .iter()
                .filter_map(move |&to| board.get(to).map(|victim| (c, to, victim)))
        })
        .collect();
    // Stable: equal values keep scan order.
    captures.sort_by_key(|&(_, _, victim)| Reverse(hint_value(victim.kind)));

    let &(attacker, to, victim) = captures.first()?;
    Some(Hint {
        kind: HintKind::Capture,
        suggestion: format!("You can capture the {}!", victim.kind),
        explanation: format!(
            "Move your {} from {} to {} to capture the opponent's piece.",
            attacker.piece.kind, attacker.square, to
        ),
        recommended_move: Some(RecommendedMove {
            from: attacker.square,
            to,
        }),
    })
}

fn development(color: Color, own: &[Candidate]) -> Option<Hint> {
    own.iter()
        .filter(|c| c.square.row() == color.back_row())
        .filter(|c| matches!(c.piece.kind, PieceType::Knight | PieceType::Bishop))
        .find_map(|c| {
            let &to = c.moves.first()?;
            Some(Hint {
                kind: HintKind::Development,
                suggestion: "Develop your pieces".into(),
                explanation: format!(
                    "Consider developing your {} to a more active square. Control the center \
                     and prepare to castle.",
                    c.piece.kind
                ),
                recommended_move: Some(RecommendedMove { from: c.square, to }),
            })
        })
}

fn center_control(own: &[Candidate]) -> Option<Hint> {
    let (from, to) = own.iter().find_map(|c| {
        c.moves
            .iter()
            .find(|to| CENTER.contains(&to.to_algebraic().as_str()))
            .map(|&to| (c.square, to))
    })?;

    Some(Hint {
        kind: HintKind::CenterControl,
        suggestion: "Control the center".into(),
        explanation: "Moving pieces to or controlling the center squares (e4, d4, e5, d5) gives \
                      you more space and options."
            .into(),
        recommended_move: Some(RecommendedMove { from, to }),
    })
}
