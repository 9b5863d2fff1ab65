use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::engine::game::Game;
use crate::engine::pgn::to_pgn;
use crate::engine::types::Square;
use crate::tutor::generate_hint;

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let games = state.games.read().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        games,
        uptime,
    })
}

// =========================================================================
// Create Game
// =========================================================================

/// POST /api/games
pub async fn create_game(
    State(state): State<SharedState>,
    Json(input): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let mut game = match input.fen.as_deref() {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    game.white_player = input.white_player.unwrap_or_else(|| "White".into());
    game.black_player = input.black_player.unwrap_or_else(|| "Black".into());

    let response = game_to_response(&game);
    let id = game.id.clone();

    let mut games = state.games.write().await;
    if games.len() >= state.config.max_games {
        return Err(ApiError::StoreFull(state.config.max_games));
    }
    games.insert(id.clone(), game);
    info!(game_id = %id, from_fen = input.fen.is_some(), "game created");

    Ok((StatusCode::CREATED, Json(response)))
}

// =========================================================================
// List Games
// =========================================================================

/// GET /api/games
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<ListGamesQuery>,
) -> Json<ListGamesResponse> {
    let games = state.games.read().await;

    let limit = query.limit.unwrap_or(10).min(100);
    let offset = query.offset.unwrap_or(0);

    let mut filtered: Vec<&Game> = games.values().collect();

    if let Some(ref status_filter) = query.status {
        let sf = status_filter.to_lowercase();
        filtered.retain(|g| g.status().as_str() == sf);
    }

    let total = filtered.len();

    // Newest first.
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let page: Vec<GameResponse> = filtered
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(game_to_response)
        .collect();

    Json(ListGamesResponse {
        games: page,
        total,
        limit,
        offset,
    })
}

// =========================================================================
// Get / Delete Game
// =========================================================================

/// GET /api/games/{id}
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    Ok(Json(game_to_response(game)))
}

/// DELETE /api/games/{id}
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut games = state.games.write().await;
    games
        .remove(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    info!(game_id = %id, "game deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Game deleted".to_string(),
    }))
}

// =========================================================================
// Moves
// =========================================================================

/// POST /api/games/{id}/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let from = parse_square(&input.from)?;
    let to = parse_square(&input.to)?;
    let promotion = input
        .promotion
        .as_deref()
        .map(|p| {
            parse_promotion(p)
                .ok_or_else(|| ApiError::InvalidRequest(format!("invalid promotion: {p}")))
        })
        .transpose()?;

    let mut games = state.games.write().await;
    let game = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let record = game.make_move(from, to, promotion)?;
    if record.status_after.is_game_over() {
        info!(game_id = %id, status = %record.status_after, "game finished");
    }

    Ok(Json(MoveResponse {
        record: record_entry(&record),
        game: game_to_response(game),
    }))
}

/// GET /api/games/{id}/moves
pub async fn get_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MoveListResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    Ok(Json(MoveListResponse {
        moves: game.records().iter().map(record_entry).collect(),
    }))
}

/// POST /api/games/{id}/undo
pub async fn undo_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<UndoResponse>, ApiError> {
    let mut games = state.games.write().await;
    let game = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let undone = game.undo_move()?;

    Ok(Json(UndoResponse {
        undone: record_entry(&undone),
        game: game_to_response(game),
    }))
}

// =========================================================================
// Hint
// =========================================================================

/// POST /api/games/{id}/hint
pub async fn hint(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<HintResponse>, ApiError> {
    let snapshot = {
        let games = state.games.read().await;
        let game = games
            .get(&id)
            .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
        game.state().clone()
    };

    let (hint, thinking_time) = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let hint = generate_hint(&snapshot);
        (hint, start.elapsed().as_millis() as u64)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Hint task panicked: {e}")))?;

    Ok(Json(hint_to_response(hint, thinking_time)))
}

// =========================================================================
// Legal Moves
// =========================================================================

/// GET /api/games/{id}/legal-moves
pub async fn legal_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<LegalMovesQuery>,
) -> Result<Json<LegalMovesResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let pairs: Vec<(Square, Square)> = match query.from.as_deref() {
        Some(from) => {
            let from = parse_square(from)?;
            game.valid_moves(from)?
                .into_iter()
                .map(|to| (from, to))
                .collect()
        }
        None => game.state().legal_moves(),
    };

    let moves = pairs
        .into_iter()
        .map(|(from, to)| LegalMoveEntry {
            from: from.to_algebraic(),
            to: to.to_algebraic(),
        })
        .collect();

    Ok(Json(LegalMovesResponse { moves }))
}

// =========================================================================
// Load FEN
// =========================================================================

/// POST /api/games/{id}/fen
pub async fn load_fen(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<FenRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let mut games = state.games.write().await;
    let game = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    game.load_fen(&input.fen)?;
    info!(game_id = %id, fen = %input.fen, "position loaded");

    Ok(Json(game_to_response(game)))
}

// =========================================================================
// Export PGN
// =========================================================================

/// GET /api/games/{id}/pgn
pub async fn export_pgn(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        to_pgn(game),
    ))
}

// =========================================================================
// Tests
// =========================================================================
