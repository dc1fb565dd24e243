use axum::extract::State;

use crate::api::format::GameCharacters;
use crate::database::StoreError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::RecordId;

/// GET /games/:id/characters - Characters that belong to one game
pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<GameCharacters> {
    let characters = state.store.list_characters_for_game(id).await?;
    // list_characters_for_game only succeeds for ids that name a row
    let game_id = i32::try_from(id).map_err(|_| StoreError::game_not_found(id))?;
    Ok(ApiResponse::success(GameCharacters {
        game_id,
        characters,
    }))
}
