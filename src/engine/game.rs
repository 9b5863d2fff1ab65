//! Game session wrapping `GameState`.
//!
//! `Game` keeps the chain of rules states, the move records handed to the
//! persistence side, and session metadata. It is the type the API layer
//! stores and mutates; the states it holds are never modified in place.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::engine::state::{GameState, MoveRecord, STARTING_FEN};
use crate::engine::types::{ChessError, Color, GameStatus, PieceType, Square};

/// A game in progress, with undo.
#[derive(Clone, Debug)]
pub struct Game {
    current: GameState,
    /// States before each committed move, oldest first.
    previous: Vec<GameState>,
    records: Vec<MoveRecord>,

    // Metadata
    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,

    started_from_fen: bool,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_state(GameState::new(), false)
    }

    /// A new game from a FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let state = GameState::from_fen(fen)?;
        Ok(Self::with_state(state, true))
    }

    fn with_state(state: GameState, from_fen: bool) -> Self {
        let starting_fen = if from_fen {
            state.to_fen()
        } else {
            STARTING_FEN.to_string()
        };
        Self {
            current: state,
            previous: Vec::new(),
            records: Vec::new(),
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            started_from_fen: from_fen,
            starting_fen,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current rules state.
    pub fn state(&self) -> &GameState {
        &self.current
    }

    /// State the game started from (after the last `load_fen`).
    pub fn initial_state(&self) -> &GameState {
        self.previous.first().unwrap_or(&self.current)
    }

    pub fn status(&self) -> GameStatus {
        self.current.status()
    }

    pub fn side_to_move(&self) -> Color {
        self.current.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.current.is_game_over()
    }

    /// One record per committed move, oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn to_fen(&self) -> String {
        self.current.to_fen()
    }

    pub fn started_from_fen(&self) -> bool {
        self.started_from_fen
    }

    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Legal destinations of the piece on `square`.
    pub fn valid_moves(&self, square: Square) -> Result<Vec<Square>, ChessError> {
        self.current.valid_moves(square)
    }

    // -----------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------

    /// Commit a move for the side to move and return its record.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<MoveRecord, ChessError> {
        let applied = self.current.apply_move(from, to, promotion)?;
        debug!(
            game_id = %self.id,
            notation = %applied.record.notation,
            status = %applied.record.status_after,
            "move committed"
        );

        let prior = std::mem::replace(&mut self.current, applied.state);
        self.previous.push(prior);
        self.records.push(applied.record.clone());
        Ok(applied.record)
    }

    /// Take back the last move and return its record.
    pub fn undo_move(&mut self) -> Result<MoveRecord, ChessError> {
        let prior = self.previous.pop().ok_or(ChessError::NothingToUndo)?;
        let record = self.records.pop().ok_or(ChessError::NothingToUndo)?;
        self.current = prior;
        Ok(record)
    }

    /// Replace the position, discarding all history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessError> {
        let state = GameState::from_fen(fen)?;
        self.starting_fen = state.to_fen();
        self.current = state;
        self.previous.clear();
        self.records.clear();
        self.started_from_fen = true;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Board array (for API responses)
    // -----------------------------------------------------------------

    /// 8×8 grid in row order (rank 8 first). Pieces look like `"wP"`,
    /// `"bK"`; empty squares are `None`.
    pub fn board_array(&self) -> [[Option<String>; 8]; 8] {
        let rows = self.current.board.rows();
        std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                rows[row][col].map(|piece| {
                    let c = match piece.color {
                        Color::White => 'w',
                        Color::Black => 'b',
                    };
                    format!("{c}{}", piece.kind.letter())
                })
            })
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
