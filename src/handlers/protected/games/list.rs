use axum::extract::State;

use crate::api::format::{GameCreated, GameList};
use crate::database::models::NewGame;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Payload;

/// GET /games - All games ordered by id
pub async fn get(State(state): State<AppState>) -> ApiResult<GameList> {
    let games = state.store.list_games().await?;
    Ok(ApiResponse::success(GameList { games }))
}

/// POST /games/create - Insert a game and return its id
pub async fn create(
    State(state): State<AppState>,
    Payload(game): Payload<NewGame>,
) -> ApiResult<GameCreated> {
    let game_id = state.store.create_game(game).await?;
    tracing::info!("Created game {}", game_id);
    Ok(ApiResponse::success(GameCreated { game_id }))
}
