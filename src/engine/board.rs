//! Grid-based board representation.
//!
//! `Board` is an 8×8 array of optional pieces indexed `[row][col]`, with row 0
//! holding black's back rank. It is a `Copy` value: every move produces a new
//! board and the board it was derived from is never touched.

use crate::engine::types::{CastleSide, ChessError, Color, MoveKind, Piece, PieceType, Position, Square};

/// An 8×8 grid of optional pieces.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

/// Standard starting position.
pub fn initialize_board() -> Board {
    Board::initial()
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting position: black on rows 0–1, white on rows 6–7.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (col, kind) in PieceType::BACK_RANK.into_iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(kind, Color::Black));
            board.squares[1][col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            board.squares[6][col] = Some(Piece::new(PieceType::Pawn, Color::White));
            board.squares[7][col] = Some(Piece::new(kind, Color::White));
        }
        board
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Piece on an on-board position.
    #[inline]
    pub fn at(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize]
    }

    /// Piece on a square.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.at(sq.position())
    }

    /// Bounds-checked lookup for caller-supplied coordinates.
    pub fn piece_at(&self, pos: Position) -> Result<Option<Piece>, ChessError> {
        if !pos.is_on_board() {
            return Err(ChessError::OutOfBounds {
                row: i16::from(pos.row),
                col: i16::from(pos.col),
            });
        }
        Ok(self.at(pos))
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.at(pos).is_none()
    }

    /// Raw grid, row 0 first.
    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.squares
    }

    /// Every occupied square in scan order (row-major, then column).
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Occupied squares of one colour in scan order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Square of the given colour's king, if one is on the board.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceType::King)
            .map(|(sq, _)| sq)
    }

    // -----------------------------------------------------------------------
    // Construction and move application
    // -----------------------------------------------------------------------

    /// Place (or clear) a square on a board under construction.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        let pos = sq.position();
        self.squares[pos.row as usize][pos.col as usize] = piece;
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.get(sq);
        self.set(sq, None);
        piece
    }

    /// Piece removed by playing `from → to` with the given kind.
    pub fn captured_by(&self, from: Square, to: Square, kind: MoveKind) -> Option<Piece> {
        match kind {
            MoveKind::EnPassant => self.get(en_passant_victim(from, to)),
            MoveKind::Castle { .. } => None,
            MoveKind::Normal | MoveKind::Promotion { .. } => self.get(to),
        }
    }

    /// Return a new board with the move applied. `self` is left as it was.
    pub fn apply(&self, from: Square, to: Square, kind: MoveKind) -> Board {
        let mut next = *self;
        let Some(piece) = next.take(from) else {
            return next;
        };

        match kind {
            MoveKind::Normal => next.set(to, Some(piece)),
            MoveKind::Promotion { choice } => next.set(to, Some(Piece::new(choice, piece.color))),
            MoveKind::EnPassant => {
                next.set(to, Some(piece));
                next.set(en_passant_victim(from, to), None);
            }
            MoveKind::Castle { side } => {
                next.set(to, Some(piece));
                let (rook_from, rook_to) = castling_rook_squares(from.row(), side);
                let rook = next.take(rook_from);
                next.set(rook_to, rook);
            }
        }
        next
    }

    // -----------------------------------------------------------------------
    // FEN piece placement
    // -----------------------------------------------------------------------

    /// Parse the piece-placement field of a FEN string.
    pub fn from_fen_placement(field: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: usize = 0;
            for ch in rank_str.chars() {
                if col > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    col += digit as usize;
                } else if let Some(piece) = Piece::from_char(ch) {
                    board.squares[row][col] = Some(piece);
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {col} squares instead of 8",
                    8 - row
                )));
            }
        }
        Ok(board)
    }

    /// Export the piece-placement field of a FEN string.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::with_capacity(72);
        for (row, cells) in self.squares.iter().enumerate() {
            let mut empty_count = 0u8;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for (row, cells) in self.squares.iter().enumerate() {
            s.push((b'8' - row as u8) as char);
            for cell in cells {
                s.push(' ');
                s.push(cell.map_or('.', Piece::to_char));
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board(")?;
        writeln!(f, "{}", self.board_string())?;
        write!(f, ")")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Special-move geometry
// ---------------------------------------------------------------------------

/// For a castling king on `row`, return (rook_from, rook_to).
pub(crate) fn castling_rook_squares(row: u8, side: CastleSide) -> (Square, Square) {
    let (from_col, to_col) = match side {
        CastleSide::King => (7, 5),
        CastleSide::Queen => (0, 3),
    };
    (
        Square::from_position(Position { row, col: from_col }),
        Square::from_position(Position { row, col: to_col }),
    )
}

/// Square of the pawn removed by an en-passant capture `from → to`.
pub(crate) fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::from_position(Position {
        row: from.row(),
        col: to.col(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
