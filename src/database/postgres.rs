//! PostgreSQL `CatalogueStore` backed by a sqlx pool.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::models::{Character, Game, GamePatch, NewCharacter, NewGame};
use super::store::{row_key, CatalogueStore, StoreError, StoreResult};

/// PostgreSQL SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

const GAME_COLUMNS: &str = "id, title, rating, completed";
const CHARACTER_COLUMNS: &str = "id, name, fighting, intelligence, good, game_id";

#[derive(Debug, Clone)]
pub struct PgCatalogueStore {
    pool: PgPool,
}

impl PgCatalogueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn game_exists(&self, id: i32) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl CatalogueStore for PgCatalogueStore {
    #[instrument(skip(self))]
    async fn list_games(&self) -> StoreResult<Vec<Game>> {
        let sql = format!("SELECT {} FROM games ORDER BY id", GAME_COLUMNS);
        let games = sqlx::query_as::<_, Game>(&sql).fetch_all(&self.pool).await?;
        Ok(games)
    }

    #[instrument(skip(self))]
    async fn get_game(&self, id: i64) -> StoreResult<Game> {
        let key = row_key(id).ok_or_else(|| StoreError::game_not_found(id))?;
        let sql = format!("SELECT {} FROM games WHERE id = $1", GAME_COLUMNS);
        sqlx::query_as::<_, Game>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    #[instrument(skip(self))]
    async fn create_game(&self, game: NewGame) -> StoreResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO games (title, rating, completed) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&game.title)
        .bind(game.rating)
        .bind(game.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn update_game(&self, id: i64, patch: GamePatch) -> StoreResult<Game> {
        let key = row_key(id).ok_or_else(|| StoreError::game_not_found(id))?;
        let sql = format!(
            "UPDATE games \
             SET rating = COALESCE($2, rating), completed = COALESCE($3, completed) \
             WHERE id = $1 RETURNING {}",
            GAME_COLUMNS
        );
        sqlx::query_as::<_, Game>(&sql)
            .bind(key)
            .bind(patch.rating)
            .bind(patch.completed)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, id: i64) -> StoreResult<i32> {
        let key = row_key(id).ok_or_else(|| StoreError::game_not_found(id))?;
        sqlx::query_scalar::<_, i32>("DELETE FROM games WHERE id = $1 RETURNING id")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    #[instrument(skip(self))]
    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        let sql = format!("SELECT {} FROM characters ORDER BY id", CHARACTER_COLUMNS);
        let characters = sqlx::query_as::<_, Character>(&sql).fetch_all(&self.pool).await?;
        Ok(characters)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, id: i64) -> StoreResult<Character> {
        let key = row_key(id).ok_or_else(|| StoreError::character_not_found(id))?;
        let sql = format!("SELECT {} FROM characters WHERE id = $1", CHARACTER_COLUMNS);
        sqlx::query_as::<_, Character>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::character_not_found(id))
    }

    #[instrument(skip(self))]
    async fn list_characters_for_game(&self, game_id: i64) -> StoreResult<Vec<Character>> {
        let key = row_key(game_id).ok_or_else(|| StoreError::game_not_found(game_id))?;
        if !self.game_exists(key).await? {
            return Err(StoreError::game_not_found(game_id));
        }

        let sql = format!(
            "SELECT {} FROM characters WHERE game_id = $1 ORDER BY id",
            CHARACTER_COLUMNS
        );
        let characters = sqlx::query_as::<_, Character>(&sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await?;
        Ok(characters)
    }

    #[instrument(skip(self))]
    async fn create_character(&self, character: NewCharacter) -> StoreResult<i32> {
        let result = sqlx::query_scalar::<_, i32>(
            "INSERT INTO characters (name, fighting, intelligence, good, game_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&character.name)
        .bind(character.fighting)
        .bind(character.intelligence)
        .bind(character.good)
        .bind(character.game_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                Err(StoreError::ForeignKey {
                    game_id: character.game_id.into(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete_character(&self, id: i64) -> StoreResult<i32> {
        let key = row_key(id).ok_or_else(|| StoreError::character_not_found(id))?;
        sqlx::query_scalar::<_, i32>("DELETE FROM characters WHERE id = $1 RETURNING id")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::character_not_found(id))
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
