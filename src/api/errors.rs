use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::engine::ChessError;

/// Structured API error that serializes to JSON.
#[derive(Debug)]
pub enum ApiError {
    GameNotFound(String),
    Chess(ChessError),
    InvalidRequest(String),
    StoreFull(usize),
    InternalError(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Stable machine-readable code for each engine failure.
fn chess_error_code(err: &ChessError) -> &'static str {
    match err {
        ChessError::InvalidSquareFormat(_) => "INVALID_SQUARE",
        ChessError::NoPieceAtSquare(_) => "NO_PIECE_AT_SQUARE",
        ChessError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
        ChessError::IllegalMove { .. } => "ILLEGAL_MOVE",
        ChessError::InvalidFen(_) => "INVALID_FEN",
        ChessError::InvalidPromotion(_) => "INVALID_PROMOTION",
        ChessError::GameOver(_) => "GAME_OVER",
        ChessError::NothingToUndo => "NOTHING_TO_UNDO",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                "GAME_NOT_FOUND",
                format!("Game not found: {id}"),
            ),
            ApiError::Chess(err) => (StatusCode::BAD_REQUEST, chess_error_code(&err), err.to_string()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::StoreFull(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_FULL",
                format!("Game limit of {max} reached; delete a game first"),
            ),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        warn!(status = status.as_u16(), code, %message, "request rejected");

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChessError> for ApiError {
    fn from(err: ChessError) -> Self {
        ApiError::Chess(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Square;
    use http_body_util::BodyExt;

    async fn error_to_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn game_not_found_returns_404() {
        let (status, json) = error_to_json(ApiError::GameNotFound("abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "GAME_NOT_FOUND");
        assert_eq!(json["error"]["message"], "Game not found: abc");
    }

    #[tokio::test]
    async fn invalid_request_returns_400() {
        let (status, json) = error_to_json(ApiError::InvalidRequest("bad input".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn store_full_returns_503() {
        let (status, json) = error_to_json(ApiError::StoreFull(3)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "STORE_FULL");
    }

    #[tokio::test]
    async fn internal_error_returns_500() {
        let (status, json) = error_to_json(ApiError::InternalError("oops".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn chess_errors_keep_their_code() {
        let cases = [
            (ChessError::InvalidFen("bad fen".into()), "INVALID_FEN"),
            (ChessError::NothingToUndo, "NOTHING_TO_UNDO"),
            (
                ChessError::NoPieceAtSquare(Square::from_algebraic("e4").unwrap()),
                "NO_PIECE_AT_SQUARE",
            ),
            (ChessError::InvalidSquareFormat("z9".into()), "INVALID_SQUARE"),
        ];
        for (err, code) in cases {
            let (status, json) = error_to_json(err.into()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"]["code"], code);
        }
    }
}
