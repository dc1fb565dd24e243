use axum::extract::State;

use crate::api::format::{CharacterDeleted, CharacterDetail};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::RecordId;

/// GET /characters/:id
pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<CharacterDetail> {
    let character = state.store.get_character(id).await?;
    Ok(ApiResponse::success(CharacterDetail { character }))
}

/// DELETE /characters/:id
pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<CharacterDeleted> {
    let character_id = state.store.delete_character(id).await?;
    tracing::info!("Deleted character {}", character_id);
    Ok(ApiResponse::success(CharacterDeleted { character_id }))
}
