pub mod board;
pub mod check;
pub mod game;
pub mod movegen;
pub mod pgn;
pub mod san;
pub mod selection;
pub mod state;
pub mod types;

pub use board::{Board, initialize_board};
pub use check::{is_checkmate, is_king_in_check, is_square_attacked, is_stalemate};
pub use game::Game;
pub use movegen::{get_valid_moves, is_path_clear, is_valid_move, legal_moves};
pub use san::move_notation;
pub use selection::{ClickOutcome, Selection};
pub use state::{AppliedMove, GameState, MoveRecord, STARTING_FEN};
pub use types::*;
