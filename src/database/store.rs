//! Catalogue persistence interface.

use async_trait::async_trait;

use super::models::{Character, Game, GamePatch, NewCharacter, NewGame};

/// Errors from a `CatalogueStore`
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("game {game_id} does not exist")]
    ForeignKey { game_id: i64 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn game_not_found(id: i64) -> Self {
        StoreError::NotFound { entity: "game", id }
    }

    pub fn character_not_found(id: i64) -> Self {
        StoreError::NotFound { entity: "character", id }
    }
}

/// Narrow an id taken from a request path to the `SERIAL` key range.
/// Anything outside it cannot name a row.
pub(crate) fn row_key(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

/// Single-row CRUD over games and characters. Implementations must be safe
/// to share across request handlers.
#[async_trait]
pub trait CatalogueStore: Send + Sync + 'static {
    // Games

    /// All games ordered by id
    async fn list_games(&self) -> StoreResult<Vec<Game>>;

    async fn get_game(&self, id: i64) -> StoreResult<Game>;

    /// Insert a game and return its new id
    async fn create_game(&self, game: NewGame) -> StoreResult<i32>;

    /// Apply a partial update and return the updated row
    async fn update_game(&self, id: i64, patch: GamePatch) -> StoreResult<Game>;

    /// Delete a game and return the deleted id
    async fn delete_game(&self, id: i64) -> StoreResult<i32>;

    // Characters

    /// All characters ordered by id
    async fn list_characters(&self) -> StoreResult<Vec<Character>>;

    async fn get_character(&self, id: i64) -> StoreResult<Character>;

    /// Characters belonging to a game; `NotFound` if the game does not exist
    async fn list_characters_for_game(&self, game_id: i64) -> StoreResult<Vec<Character>>;

    /// Insert a character and return its new id. `ForeignKey` if the game is missing.
    async fn create_character(&self, character: NewCharacter) -> StoreResult<i32>;

    /// Delete a character and return the deleted id
    async fn delete_character(&self, id: i64) -> StoreResult<i32>;

    /// Cheap liveness probe for `/health`
    async fn health_check(&self) -> StoreResult<()>;
}
