//! PGN (Portable Game Notation) export.
//!
//! Seven Tag Roster plus numbered movetext built from the session's move
//! records. Move tokens are the simplified notation the records carry.

use crate::engine::game::Game;
use crate::engine::types::{Color, GameStatus};

const LINE_WIDTH: usize = 80;

/// Export a game as a PGN string.
pub fn to_pgn(game: &Game) -> String {
    let mut pgn = String::with_capacity(512);

    let date = game.created_at.format("%Y.%m.%d").to_string();
    let result = result_string(game.status(), game.side_to_move());

    pgn.push_str("[Event \"Casual Game\"]\n");
    pgn.push_str("[Site \"chess-tutor\"]\n");
    pgn.push_str(&format!("[Date \"{date}\"]\n"));
    pgn.push_str("[Round \"-\"]\n");
    pgn.push_str(&format!("[White \"{}\"]\n", game.white_player));
    pgn.push_str(&format!("[Black \"{}\"]\n", game.black_player));
    pgn.push_str(&format!("[Result \"{result}\"]\n"));

    if game.started_from_fen() {
        pgn.push_str("[SetUp \"1\"]\n");
        pgn.push_str(&format!("[FEN \"{}\"]\n", game.starting_fen()));
    }
    pgn.push('\n');

    let initial = game.initial_state();
    let mut move_num = initial.fullmove_number;
    let mut white_turn = initial.turn == Color::White;

    let mut tokens = Vec::with_capacity(game.records().len() + 1);
    for (i, record) in game.records().iter().enumerate() {
        let token = if white_turn {
            format!("{move_num}. {}", record.notation)
        } else if i == 0 {
            format!("{move_num}... {}", record.notation)
        } else {
            record.notation.clone()
        };
        tokens.push(token);

        if !white_turn {
            move_num += 1;
        }
        white_turn = !white_turn;
    }
    tokens.push(result.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + token.len() + 1 > LINE_WIDTH {
            pgn.push_str(&line);
            pgn.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    pgn.push_str(&line);
    pgn.push('\n');

    pgn
}

/// PGN result token. On checkmate the side left to move has lost.
fn result_string(status: GameStatus, side_to_move: Color) -> &'static str {
    match (status, side_to_move) {
        (GameStatus::Checkmate, Color::White) => "0-1",
        (GameStatus::Checkmate, Color::Black) => "1-0",
        (GameStatus::Stalemate, _) => "1/2-1/2",
        (GameStatus::Active | GameStatus::Check, _) => "*",
    }
}
