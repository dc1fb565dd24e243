use axum::extract::State;

use crate::api::format::{GameDeleted, GameDetail, GameUpdated};
use crate::database::models::GamePatch;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{Payload, RecordId};

/// GET /games/:id
pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<GameDetail> {
    let game = state.store.get_game(id).await?;
    Ok(ApiResponse::success(GameDetail { game }))
}

/// PATCH /games/:id - Update `rating` (sent as `new_rating`) and/or `completed`
pub async fn patch(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(patch): Payload<GamePatch>,
) -> ApiResult<GameUpdated> {
    let game = if patch.is_empty() {
        state.store.get_game(id).await?
    } else {
        state.store.update_game(id, patch).await?
    };
    Ok(ApiResponse::success(GameUpdated { title: game.title }))
}

/// DELETE /games/:id
pub async fn delete(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<GameDeleted> {
    let game_id = state.store.delete_game(id).await?;
    tracing::info!("Deleted game {}", game_id);
    Ok(ApiResponse::success(GameDeleted { game_id }))
}
