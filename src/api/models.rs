use serde::{Deserialize, Serialize};

use crate::engine::game::Game;
use crate::engine::state::MoveRecord;
use crate::engine::types::{Color, PieceType, Square};
use crate::tutor::{Hint, HintKind};

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub fen: Option<String>,
    pub white_player: Option<String>,
    pub black_player: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenRequest {
    pub fen: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesQuery {
    pub from: Option<String>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub games: usize,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub board: Vec<Vec<Option<String>>>,
    pub fen: String,
    pub status: String,
    pub current_player: String,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub castling: String,
    pub en_passant: Option<String>,
    pub move_history: Vec<MoveRecordEntry>,
    pub captured_pieces: CapturedPieces,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<LastMove>,
    pub players: Players,
    pub created_at: String,
}

/// One committed move in the shape a persistence layer stores it.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecordEntry {
    pub move_number: u32,
    pub color: String,
    pub from_square: String,
    pub to_square: String,
    pub piece_type: String,
    pub captured_piece_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    pub notation: String,
    pub status_after: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    /// White pieces taken by black.
    pub white: Vec<String>,
    /// Black pieces taken by white.
    pub black: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub from: String,
    pub to: String,
    pub notation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Players {
    pub white: String,
    pub black: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesResponse {
    pub games: Vec<GameResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub record: MoveRecordEntry,
    pub game: GameResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveListResponse {
    pub moves: Vec<MoveRecordEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoResponse {
    pub undone: MoveRecordEntry,
    pub game: GameResponse,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegalMoveEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesResponse {
    pub moves: Vec<LegalMoveEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMoveEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResponse {
    pub kind: String,
    pub suggestion: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_move: Option<RecommendedMoveEntry>,
    pub thinking_time: u64,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn color_name(c: Color) -> &'static str {
    match c {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// Promotion choice from a request: a letter or a piece name.
pub fn parse_promotion(s: &str) -> Option<PieceType> {
    PieceType::from_str_loose(s)
}

pub fn parse_square(s: &str) -> Result<Square, crate::engine::ChessError> {
    s.parse()
}

fn hint_kind_name(kind: HintKind) -> &'static str {
    match kind {
        HintKind::CheckResponse => "checkResponse",
        HintKind::Threatened => "threatened",
        HintKind::Capture => "capture",
        HintKind::Development => "development",
        HintKind::CenterControl => "centerControl",
        HintKind::General => "general",
    }
}

/// 8×8 board, row 0 = rank 8. Pieces are `"wP"`, `"bK"`, … Empty = None.
pub fn board_to_api(game: &Game) -> Vec<Vec<Option<String>>> {
    game.board_array().into_iter().map(Vec::from).collect()
}

pub fn record_entry(record: &MoveRecord) -> MoveRecordEntry {
    MoveRecordEntry {
        move_number: record.move_number,
        color: color_name(record.color).to_string(),
        from_square: record.from_square.to_algebraic(),
        to_square: record.to_square.to_algebraic(),
        piece_type: record.piece_type.to_string(),
        captured_piece_type: record.captured_piece_type.map(|pt| pt.to_string()),
        promotion: record.promotion.map(|pt| pt.to_string()),
        notation: record.notation.clone(),
        status_after: record.status_after.as_str().to_string(),
    }
}

/// Captured material, read from the move records.
pub fn captured_pieces(game: &Game) -> CapturedPieces {
    let mut lost = CapturedPieces {
        white: Vec::new(),
        black: Vec::new(),
    };
    for record in game.records() {
        let Some(pt) = record.captured_piece_type else {
            continue;
        };
        // The mover's opponent lost the piece.
        match record.color {
            Color::White => lost.black.push(pt.to_string()),
            Color::Black => lost.white.push(pt.to_string()),
        }
    }
    lost
}

pub fn game_to_response(game: &Game) -> GameResponse {
    let state = game.state();
    GameResponse {
        id: game.id.clone(),
        board: board_to_api(game),
        fen: game.to_fen(),
        status: game.status().as_str().to_string(),
        current_player: color_name(game.side_to_move()).to_string(),
        check: state.check,
        checkmate: state.checkmate,
        stalemate: state.stalemate,
        castling: state.castling.to_fen(),
        en_passant: state.en_passant.map(|sq| sq.to_algebraic()),
        move_history: game.records().iter().map(record_entry).collect(),
        captured_pieces: captured_pieces(game),
        last_move: game.records().last().map(|r| LastMove {
            from: r.from_square.to_algebraic(),
            to: r.to_square.to_algebraic(),
            notation: r.notation.clone(),
        }),
        players: Players {
            white: game.white_player.clone(),
            black: game.black_player.clone(),
        },
        created_at: game.created_at.to_rfc3339(),
    }
}

pub fn hint_to_response(hint: Hint, thinking_time: u64) -> HintResponse {
    HintResponse {
        kind: hint_kind_name(hint.kind).to_string(),
        suggestion: hint.suggestion,
        explanation: hint.explanation,
        recommended_move: hint.recommended_move.map(|m| RecommendedMoveEntry {
            from: m.from.to_algebraic(),
            to: m.to.to_algebraic(),
        }),
        thinking_time,
    }
}
