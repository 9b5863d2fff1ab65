//! Rules state.
//!
//! `GameState` is a value: committing a move never modifies it, it produces
//! a successor together with an `MoveRecord` describing what changed. It
//! holds no interaction state (see `selection`) and performs no I/O.

use crate::engine::board::{Board, castling_rook_squares};
use crate::engine::check::is_king_in_check;
use crate::engine::movegen::{self, classify_move, destinations, has_legal_move};
use crate::engine::san::move_notation;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, GameStatus, Move, MoveContext, MoveKind,
    Piece, PieceType, Position, Square,
};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// =========================================================================
// GameState
// =========================================================================

/// Complete rules state of a game at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Side to move.
    pub turn: Color,
    /// Every committed move, oldest first.
    pub move_history: Vec<Move>,
    pub castling: CastlingRights,
    /// Square a pawn passed over on the previous double push.
    pub en_passant: Option<Square>,
    /// `turn`'s king is attacked.
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// One committed move, as handed to whatever persists or displays it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based ply number.
    pub move_number: u32,
    pub color: Color,
    pub from_square: Square,
    pub to_square: Square,
    pub piece_type: PieceType,
    pub captured_piece_type: Option<PieceType>,
    pub promotion: Option<PieceType>,
    pub notation: String,
    pub status_after: GameStatus,
}

/// Result of committing a move: the successor state and the change record.
#[derive(Clone, Debug)]
pub struct AppliedMove {
    pub state: GameState,
    pub record: MoveRecord,
}

impl GameState {
    /// Standard starting position, white to move.
    pub fn new() -> Self {
        Self::with_board(Board::initial(), Color::White)
    }

    /// A fresh state around an arbitrary board. Castling rights start empty
    /// unless the board is the standard start; flags are computed.
    pub fn with_board(board: Board, turn: Color) -> Self {
        let castling = if board == Board::initial() {
            CastlingRights::ALL
        } else {
            CastlingRights::NONE
        };
        let mut state = Self {
            board,
            turn,
            move_history: Vec::new(),
            castling,
            en_passant: None,
            check: false,
            checkmate: false,
            stalemate: false,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        state.refresh_flags();
        state
    }

    /// Parse a FEN string. The move counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 4 or 6 fields, got {}",
                parts.len()
            )));
        }

        let board = Board::from_fen_placement(parts[0])?;

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: {other:?}"
                )));
            }
        };

        let castling = CastlingRights::from_fen(parts[2])
            .ok_or_else(|| ChessError::InvalidFen(format!("invalid castling: {:?}", parts[2])))?;
        let castling = castling_supported_by(&board, castling);

        let en_passant = match parts[3] {
            "-" => None,
            s => {
                let target = Square::from_algebraic(s).map_err(|_| {
                    ChessError::InvalidFen(format!("invalid en passant square: {s:?}"))
                })?;
                if !en_passant_plausible(&board, turn, target) {
                    return Err(ChessError::InvalidFen(format!(
                        "en passant square {s} does not follow a double pawn push"
                    )));
                }
                Some(target)
            }
        };

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let half = parts[4]
                .parse()
                .map_err(|_| ChessError::InvalidFen(format!("invalid halfmove: {:?}", parts[4])))?;
            let full = parts[5]
                .parse()
                .map_err(|_| ChessError::InvalidFen(format!("invalid fullmove: {:?}", parts[5])))?;
            (half, full)
        } else {
            (0, 1)
        };

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|(_, p)| p.kind == PieceType::King)
                .count();
            if kings != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "expected one {color} king, found {kings}"
                )));
            }
        }
        if is_king_in_check(&board, !turn) {
            return Err(ChessError::InvalidFen(
                "side not to move is in check".into(),
            ));
        }

        let mut state = Self {
            board,
            turn,
            move_history: Vec::new(),
            castling,
            en_passant,
            check: false,
            checkmate: false,
            stalemate: false,
            halfmove_clock,
            fullmove_number,
        };
        state.refresh_flags();
        Ok(state)
    }

    /// Serialise to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let turn = match self.turn {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".into());
        format!(
            "{} {} {} {} {} {}",
            self.board.to_fen_placement(),
            turn,
            self.castling.to_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Special-move rights for move validation.
    pub fn context(&self) -> MoveContext {
        MoveContext {
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if self.check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate
    }

    /// Legal destinations for the piece on `square`, whichever side owns it.
    pub fn valid_moves(&self, square: Square) -> Result<Vec<Square>, ChessError> {
        movegen::get_valid_moves(&self.board, square, &self.context())
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        movegen::legal_moves(&self.board, self.turn, &self.context())
    }

    // -----------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------

    /// Commit `from → to` for the side to move.
    ///
    /// `promotion` picks the piece a pawn becomes on the last row (queen if
    /// omitted). Supplying it for any other move is an error.
    pub fn apply_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<AppliedMove, ChessError> {
        if self.is_game_over() {
            return Err(ChessError::GameOver(self.status().to_string()));
        }

        let piece = self.board.get(from).ok_or(ChessError::NoPieceAtSquare(from))?;
        if piece.color != self.turn {
            return Err(illegal(from, to, format!("it is {}'s turn", self.turn)));
        }
        if !destinations(&self.board, from, piece, &self.context()).contains(&to) {
            return Err(illegal(from, to, format!("{piece} cannot move there")));
        }

        let kind = match (classify_move(&self.board, from, to, piece), promotion) {
            (MoveKind::Promotion { .. }, Some(choice)) if !choice.is_promotion_choice() => {
                return Err(ChessError::InvalidPromotion(format!(
                    "cannot promote to {choice}"
                )));
            }
            (MoveKind::Promotion { .. }, Some(choice)) => MoveKind::Promotion { choice },
            (_, Some(choice)) => {
                return Err(ChessError::InvalidPromotion(format!(
                    "{from}{to} is not a promotion (got {choice})"
                )));
            }
            (kind, None) => kind,
        };

        let captured = self.board.captured_by(from, to, kind);
        let mut mv = Move {
            from,
            to,
            piece,
            captured,
            kind,
            notation: String::new(),
        };
        mv.notation = move_notation(&mv, &self.board);

        let board = self.board.apply(from, to, kind);

        let mut castling = self.castling;
        if piece.kind == PieceType::King {
            castling.revoke_all(piece.color);
        }
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::King, CastleSide::Queen] {
                let (corner, _) = castling_rook_squares(color.back_row(), side);
                if from == corner || to == corner {
                    castling.revoke(color, side);
                }
            }
        }

        let en_passant = (piece.kind == PieceType::Pawn && from.row().abs_diff(to.row()) == 2)
            .then(|| {
                Square::from_position(Position {
                    row: (from.row() + to.row()) / 2,
                    col: from.col(),
                })
            });

        let halfmove_clock = if piece.kind == PieceType::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_number = match self.turn {
            Color::Black => self.fullmove_number.saturating_add(1),
            Color::White => self.fullmove_number,
        };

        let mut move_history = self.move_history.clone();
        move_history.push(mv.clone());

        let mut state = GameState {
            board,
            turn: !self.turn,
            move_history,
            castling,
            en_passant,
            check: false,
            checkmate: false,
            stalemate: false,
            halfmove_clock,
            fullmove_number,
        };
        state.refresh_flags();

        let record = MoveRecord {
            move_number: state.move_history.len() as u32,
            color: piece.color,
            from_square: from,
            to_square: to,
            piece_type: piece.kind,
            captured_piece_type: captured.map(|p| p.kind),
            promotion: mv.promotion(),
            notation: mv.notation,
            status_after: state.status(),
        };

        Ok(AppliedMove { state, record })
    }

    /// Recompute check, checkmate and stalemate for the side to move.
    fn refresh_flags(&mut self) {
        let check = is_king_in_check(&self.board, self.turn);
        let can_move = has_legal_move(&self.board, self.turn, &self.context());
        self.check = check;
        self.checkmate = check && !can_move;
        self.stalemate = !check && !can_move;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop rights whose king or rook is not on its home square.
fn castling_supported_by(board: &Board, mut rights: CastlingRights) -> CastlingRights {
    for color in [Color::White, Color::Black] {
        let row = color.back_row();
        let king_home = Square::from_position(Position { row, col: 4 });
        if board.get(king_home) != Some(Piece::new(PieceType::King, color)) {
            rights.revoke_all(color);
            continue;
        }
        for side in [CastleSide::King, CastleSide::Queen] {
            let (corner, _) = castling_rook_squares(row, side);
            if board.get(corner) != Some(Piece::new(PieceType::Rook, color)) {
                rights.revoke(color, side);
            }
        }
    }
    rights
}

/// The target must sit on the square the opponent's pawn just skipped: on
/// rank 6 with white to move or rank 3 with black to move, empty, with that
/// pawn on the square beyond it.
fn en_passant_plausible(board: &Board, turn: Color, target: Square) -> bool {
    let pusher = !turn;
    let skipped_row = pusher.pawn_row() as i8 + pusher.pawn_direction();
    if target.row() as i8 != skipped_row || board.get(target).is_some() {
        return false;
    }
    target
        .position()
        .offset(pusher.pawn_direction(), 0)
        .and_then(|pos| board.at(pos))
        == Some(Piece::new(PieceType::Pawn, pusher))
}

fn illegal(from: Square, to: Square, reason: String) -> ChessError {
    ChessError::IllegalMove {
        from: from.to_algebraic(),
        to: to.to_algebraic(),
        reason,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(state: &GameState, from: &str, to: &str) -> GameState {
        state.apply_move(sq(from), sq(to), None).unwrap().state
    }

    #[test]
    fn new_state_is_standard_start() {
        let s = GameState::new();
        assert_eq!(s.to_fen(), STARTING_FEN);
        assert_eq!(s.turn, Color::White);
        assert_eq!(s.status(), GameStatus::Active);
        assert_eq!(s.legal_moves().len(), 20);
        assert_eq!(GameState::from_fen(STARTING_FEN).unwrap(), s);
    }

    #[test]
    fn fen_round_trip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        ] {
            assert_eq!(GameState::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn fen_en_passant_target_allows_the_capture() {
        let s = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(s.en_passant, Some(sq("d6")));
        assert!(s.valid_moves(sq("e5")).unwrap().contains(&sq("d6")));

        let s = GameState::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        assert!(s.valid_moves(sq("d4")).unwrap().contains(&sq("e3")));
    }

    #[test]
    fn fen_castling_rights_follow_the_pieces() {
        let s = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").unwrap();
        assert_eq!(s.castling, CastlingRights::NONE);
        assert_eq!(s.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");

        // White keeps only the h1 rook; black's king has left e8.
        let s = GameState::from_fen("r2k3r/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert_eq!(s.castling.to_fen(), "K");
    }

    #[test]
    fn fen_without_counters() {
        let s = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b -").unwrap_err();
        assert!(matches!(s, ChessError::InvalidFen(_)));
        let s = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(s.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn fen_rejects_bad_input() {
        for fen in [
            "",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KK2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w XY - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - z9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - a 1",
            // Black is in check with white to move.
            "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
            // En-passant target on the wrong rank for the side to move.
            "4k3/8/8/3pP3/8/8/8/4K3 b - e4 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 1",
            // Right rank, but no pawn just beyond the target.
            "4k3/8/8/8/8/8/8/4K3 w - d6 0 1",
            "4k3/8/8/8/4p3/8/8/4K3 b - e3 0 1",
            // Target square occupied.
            "4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1",
        ] {
            assert!(
                matches!(GameState::from_fen(fen), Err(ChessError::InvalidFen(_))),
                "accepted {fen:?}"
            );
        }
    }

    #[test]
    fn apply_move_leaves_input_untouched() {
        let start = GameState::new();
        let applied = start.apply_move(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(start, GameState::new());
        assert_eq!(applied.state.turn, Color::Black);
        assert_eq!(applied.state.move_history.len(), 1);
        assert_eq!(applied.state.en_passant, Some(sq("e3")));
        assert_eq!(
            applied.state.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );

        let record = applied.record;
        assert_eq!(record.move_number, 1);
        assert_eq!(record.color, Color::White);
        assert_eq!(record.piece_type, PieceType::Pawn);
        assert_eq!(record.captured_piece_type, None);
        assert_eq!(record.notation, "e4");
        assert_eq!(record.status_after, GameStatus::Active);
    }

    #[test]
    fn turn_alternates_and_history_appends() {
        let s = play(&GameState::new(), "e2", "e4");
        let s = play(&s, "e7", "e5");
        let s = play(&s, "g1", "f3");
        assert_eq!(s.turn, Color::Black);
        let notations: Vec<&str> = s.move_history.iter().map(|m| m.notation.as_str()).collect();
        assert_eq!(notations, ["e4", "e5", "Nf3"]);
        assert_eq!(s.en_passant, None);
        assert_eq!(s.halfmove_clock, 1);
        assert_eq!(s.fullmove_number, 2);
    }

    #[test]
    fn rejects_wrong_turn_empty_square_and_illegal_target() {
        let s = GameState::new();
        assert!(matches!(
            s.apply_move(sq("e7"), sq("e5"), None),
            Err(ChessError::IllegalMove { .. })
        ));
        assert_eq!(
            s.apply_move(sq("e4"), sq("e5"), None).unwrap_err(),
            ChessError::NoPieceAtSquare(sq("e4"))
        );
        assert!(matches!(
            s.apply_move(sq("e2"), sq("e5"), None),
            Err(ChessError::IllegalMove { .. })
        ));
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut s = GameState::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
            s = play(&s, from, to);
        }
        let applied = s.apply_move(sq("d8"), sq("h4"), None).unwrap();
        assert_eq!(applied.record.notation, "Qh4");
        assert_eq!(applied.record.status_after, GameStatus::Checkmate);

        let s = applied.state;
        assert!(s.check && s.checkmate && !s.stalemate);
        assert!(s.legal_moves().is_empty());
        assert!(matches!(
            s.apply_move(sq("a2"), sq("a3"), None),
            Err(ChessError::GameOver(_))
        ));
    }

    #[test]
    fn stalemate_after_move() {
        let s = GameState::from_fen("k7/2K5/8/1Q6/8/8/8/8 w - - 0 1").unwrap();
        let s = play(&s, "b5", "b6");
        assert!(s.stalemate);
        assert!(!s.check);
        assert_eq!(s.status(), GameStatus::Stalemate);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let s = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let applied = s.apply_move(sq("e1"), sq("g1"), None).unwrap();
        assert_eq!(applied.record.notation, "O-O");
        let s = applied.state;
        assert_eq!(s.board.get(sq("f1")).map(|p| p.kind), Some(PieceType::Rook));
        assert_eq!(s.board.get(sq("h1")), None);
        assert_eq!(s.castling.to_fen(), "kq");

        // Capturing a rook on its corner strips that right too.
        let s = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let s = play(&s, "a1", "a8");
        assert_eq!(s.castling.to_fen(), "Kk");
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        let s = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        let s = play(&s, "d7", "d5");
        assert_eq!(s.en_passant, Some(sq("d6")));
        let applied = s.apply_move(sq("e5"), sq("d6"), None).unwrap();
        assert_eq!(applied.record.notation, "exd6");
        assert_eq!(applied.record.captured_piece_type, Some(PieceType::Pawn));
        assert_eq!(applied.state.board.get(sq("d5")), None);
        assert_eq!(applied.state.en_passant, None);
    }

    #[test]
    fn promotion_choices() {
        let s = GameState::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        let queen = s.apply_move(sq("e7"), sq("e8"), None).unwrap();
        assert_eq!(
            queen.state.board.get(sq("e8")),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
        assert_eq!(queen.record.notation, "e8=Q");
        assert_eq!(queen.record.status_after, GameStatus::Check);

        let knight = s
            .apply_move(sq("e7"), sq("e8"), Some(PieceType::Knight))
            .unwrap();
        assert_eq!(knight.record.promotion, Some(PieceType::Knight));
        assert_eq!(knight.record.notation, "e8=N");

        assert!(matches!(
            s.apply_move(sq("e7"), sq("e8"), Some(PieceType::King)),
            Err(ChessError::InvalidPromotion(_))
        ));
        assert!(matches!(
            s.apply_move(sq("e1"), sq("d1"), Some(PieceType::Queen)),
            Err(ChessError::InvalidPromotion(_))
        ));
    }

    #[test]
    fn with_board_computes_flags() {
        let board = Board::from_fen_placement("k7/2K5/1Q6/8/8/8/8/8").unwrap();
        let s = GameState::with_board(board, Color::Black);
        assert!(s.stalemate);
        assert_eq!(s.castling, CastlingRights::NONE);
        assert_eq!(GameState::with_board(Board::initial(), Color::White), GameState::new());
    }
}
