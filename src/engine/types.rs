use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Row delta of a single pawn step. White pawns travel toward row 0.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the pawns of this colour start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row holding this colour's pieces at the start of the game.
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row on which this colour's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType & Piece
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Piece order along either back rank, file a through h.
    pub const BACK_RANK: [PieceType; 8] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];

    /// Uppercase letter used in notation and FEN.
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Parse a promotion choice: a letter (`q`, `N`) or a name (`queen`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "pawn" => Some(PieceType::Pawn),
            "n" | "knight" => Some(PieceType::Knight),
            "b" | "bishop" => Some(PieceType::Bishop),
            "r" | "rook" => Some(PieceType::Rook),
            "q" | "queen" => Some(PieceType::Queen),
            "k" | "king" => Some(PieceType::King),
            _ => None,
        }
    }

    /// Whether a pawn may promote to this piece type.
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

/// A coloured piece. Plain value, copied freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Piece { kind, color }
    }

    /// FEN character: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parse a FEN piece character.
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some(Piece { kind, color })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Position & Square
// ---------------------------------------------------------------------------

/// Zero-based grid coordinate. `(0, 0)` is a8, `(7, 7)` is h1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Checked constructor.
    pub fn new(row: u8, col: u8) -> Result<Self, ChessError> {
        if row < 8 && col < 8 {
            Ok(Position { row, col })
        } else {
            Err(ChessError::OutOfBounds {
                row: i16::from(row),
                col: i16::from(col),
            })
        }
    }

    #[inline]
    pub fn is_on_board(self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Step by a signed delta, or `None` when that leaves the grid.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

/// A board cell named by its algebraic label (`a1` … `h8`).
///
/// Stored as the row-major grid index `row * 8 + col`, so ordering squares
/// by value reproduces the board scan order (a8, b8, … h1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Square for an on-board position.
    #[inline]
    pub fn from_position(pos: Position) -> Self {
        debug_assert!(pos.is_on_board(), "position off board: {pos:?}");
        Square(pos.row * 8 + pos.col)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn position(self) -> Position {
        Position {
            row: self.row(),
            col: self.col(),
        }
    }

    /// File letter, `a` through `h`.
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// Rank digit, `1` through `8`.
    #[inline]
    pub fn rank_char(self) -> char {
        (b'0' + (8 - self.row())) as char
    }

    /// All 64 squares in scan order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Result<Self, ChessError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquareFormat(s.to_string()));
        }
        let col = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if col < 8 && rank < 8 {
            Ok(Square((7 - rank) * 8 + col))
        } else {
            Err(ChessError::InvalidSquareFormat(s.to_string()))
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

/// Map an algebraic label to its grid position.
pub fn square_to_position(square: &str) -> Result<Position, ChessError> {
    Square::from_algebraic(square).map(Square::position)
}

/// Map a grid position to its algebraic label.
pub fn position_to_square(pos: Position) -> Result<String, ChessError> {
    if !pos.is_on_board() {
        return Err(ChessError::OutOfBounds {
            row: i16::from(pos.row),
            col: i16::from(pos.col),
        });
    }
    Ok(Square::from_position(pos).to_algebraic())
}

// ---------------------------------------------------------------------------
// CastlingRights & MoveContext
// ---------------------------------------------------------------------------

/// Which wing a castling move goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Castling eligibility for one colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SideRights {
    pub king_side: bool,
    pub queen_side: bool,
}

/// Castling eligibility for both colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white: SideRights {
            king_side: false,
            queen_side: false,
        },
        black: SideRights {
            king_side: false,
            queen_side: false,
        },
    };

    pub const ALL: CastlingRights = CastlingRights {
        white: SideRights {
            king_side: true,
            queen_side: true,
        },
        black: SideRights {
            king_side: true,
            queen_side: true,
        },
    };

    pub fn for_color(self, color: Color) -> SideRights {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn for_color_mut(&mut self, color: Color) -> &mut SideRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn allows(self, color: Color, side: CastleSide) -> bool {
        let rights = self.for_color(color);
        match side {
            CastleSide::King => rights.king_side,
            CastleSide::Queen => rights.queen_side,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        let rights = self.for_color_mut(color);
        match side {
            CastleSide::King => rights.king_side = false,
            CastleSide::Queen => rights.queen_side = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        *self.for_color_mut(color) = SideRights {
            king_side: false,
            queen_side: false,
        };
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        for c in s.chars() {
            match c {
                'K' => rights.white.king_side = true,
                'Q' => rights.white.queen_side = true,
                'k' => rights.black.king_side = true,
                'q' => rights.black.queen_side = true,
                _ => return None,
            }
        }
        Some(rights)
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        let mut s = String::with_capacity(4);
        if self.white.king_side {
            s.push('K');
        }
        if self.white.queen_side {
            s.push('Q');
        }
        if self.black.king_side {
            s.push('k');
        }
        if self.black.queen_side {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

/// The special-move rights a move-validity test is evaluated under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveContext {
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

impl MoveContext {
    /// No castling rights and no en-passant target. Used for pure attack tests.
    pub const NONE: MoveContext = MoveContext {
        castling: CastlingRights::NONE,
        en_passant: None,
    };
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// How a move affects the board beyond relocating the moving piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Castle { side: CastleSide },
    EnPassant,
    Promotion { choice: PieceType },
}

/// A move applied (or about to be applied) to a board.
///
/// `piece` is the piece standing on `from` in the board the move was built
/// against; `captured` is what it removes, if anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    pub notation: String,
}

impl Move {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn promotion(&self) -> Option<PieceType> {
        match self.kind {
            MoveKind::Promotion { choice } => Some(choice),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game, from the side to move's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine. Every variant is per-call and
/// recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid square notation: {0:?}")]
    InvalidSquareFormat(String),

    #[error("no piece on {0}")]
    NoPieceAtSquare(Square),

    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: i16, col: i16 },

    #[error("illegal move: {from} -> {to}: {reason}")]
    IllegalMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_rows() {
        assert_eq!(Color::White.pawn_direction(), -1);
        assert_eq!(Color::Black.pawn_direction(), 1);
        assert_eq!(Color::White.back_row(), 7);
        assert_eq!(Color::Black.back_row(), 0);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::Black.promotion_row(), 7);
    }

    #[test]
    fn piece_char_round_trip() {
        for kind in PieceType::ALL {
            for color in [Color::White, Color::Black] {
                let piece = Piece::new(kind, color);
                assert_eq!(Piece::from_char(piece.to_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn piece_type_from_str_loose() {
        assert_eq!(PieceType::from_str_loose("q"), Some(PieceType::Queen));
        assert_eq!(PieceType::from_str_loose("Knight"), Some(PieceType::Knight));
        assert_eq!(PieceType::from_str_loose("dragon"), None);
        assert!(!PieceType::King.is_promotion_choice());
        assert!(!PieceType::Pawn.is_promotion_choice());
        assert!(PieceType::Rook.is_promotion_choice());
    }

    #[test]
    fn square_labels_map_to_grid() {
        assert_eq!(sq("a8").position(), Position { row: 0, col: 0 });
        assert_eq!(sq("h1").position(), Position { row: 7, col: 7 });
        assert_eq!(sq("e4").position(), Position { row: 4, col: 4 });
        assert_eq!(sq("e2").position(), Position { row: 6, col: 4 });
    }

    #[test]
    fn square_ordering_follows_scan_order() {
        assert!(sq("a8") < sq("h8"));
        assert!(sq("h8") < sq("a7"));
        assert!(sq("a1") < sq("h1"));
        assert_eq!(Square::all().next(), Some(sq("a8")));
        assert_eq!(Square::all().last(), Some(sq("h1")));
    }

    #[test]
    fn square_from_algebraic_invalid() {
        for bad in ["", "a", "a9", "i1", "abc", "A1", "a0"] {
            assert_eq!(
                Square::from_algebraic(bad),
                Err(ChessError::InvalidSquareFormat(bad.to_string()))
            );
        }
    }

    #[test]
    fn codec_functions() {
        assert_eq!(square_to_position("c6"), Ok(Position { row: 2, col: 2 }));
        assert_eq!(
            position_to_square(Position { row: 2, col: 2 }),
            Ok("c6".to_string())
        );
        assert_eq!(
            position_to_square(Position { row: 8, col: 0 }),
            Err(ChessError::OutOfBounds { row: 8, col: 0 })
        );
        assert!(matches!(
            square_to_position("z9"),
            Err(ChessError::InvalidSquareFormat(_))
        ));
    }

    #[test]
    fn position_new_and_offset() {
        assert!(Position::new(7, 7).is_ok());
        assert!(matches!(
            Position::new(0, 8),
            Err(ChessError::OutOfBounds { row: 0, col: 8 })
        ));
        let p = Position { row: 0, col: 7 };
        assert_eq!(p.offset(1, -1), Some(Position { row: 1, col: 6 }));
        assert_eq!(p.offset(-1, 0), None);
        assert_eq!(p.offset(0, 1), None);
    }

    #[test]
    fn castling_rights_fen_round_trip() {
        for s in ["-", "K", "Kq", "KQkq", "kq", "Q"] {
            let cr = CastlingRights::from_fen(s).unwrap();
            assert_eq!(cr.to_fen(), s);
        }
        assert_eq!(CastlingRights::from_fen("KZ"), None);
    }

    #[test]
    fn castling_rights_revoke() {
        let mut cr = CastlingRights::ALL;
        cr.revoke(Color::White, CastleSide::King);
        assert!(!cr.allows(Color::White, CastleSide::King));
        assert!(cr.allows(Color::White, CastleSide::Queen));
        cr.revoke_all(Color::Black);
        assert_eq!(cr.to_fen(), "Q");
    }

    #[test]
    fn move_display() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        let mv = Move {
            from: sq("e7"),
            to: sq("e8"),
            piece: pawn,
            captured: None,
            kind: MoveKind::Promotion {
                choice: PieceType::Queen,
            },
            notation: String::new(),
        };
        assert_eq!(mv.to_string(), "e7e8=q");
        assert_eq!(mv.promotion(), Some(PieceType::Queen));
        assert!(!mv.is_capture());
    }

    #[test]
    fn game_status_strings() {
        assert_eq!(GameStatus::Active.as_str(), "active");
        assert_eq!(GameStatus::Check.as_str(), "check");
        assert_eq!(GameStatus::Checkmate.as_str(), "checkmate");
        assert_eq!(GameStatus::Stalemate.as_str(), "stalemate");
        assert!(GameStatus::Checkmate.is_game_over());
        assert!(GameStatus::Stalemate.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
    }
}
