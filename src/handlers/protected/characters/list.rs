use axum::extract::State;

use crate::api::format::{CharacterCreated, CharacterList};
use crate::database::models::NewCharacter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Payload;

/// GET /characters - All characters ordered by id
pub async fn get(State(state): State<AppState>) -> ApiResult<CharacterList> {
    let characters = state.store.list_characters().await?;
    Ok(ApiResponse::success(CharacterList { characters }))
}

/// POST /characters/create - Insert a character for an existing game
pub async fn create(
    State(state): State<AppState>,
    Payload(character): Payload<NewCharacter>,
) -> ApiResult<CharacterCreated> {
    let character_id = state.store.create_character(character).await?;
    tracing::info!("Created character {}", character_id);
    Ok(ApiResponse::success(CharacterCreated { character_id }))
}
