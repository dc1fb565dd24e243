//! In-memory `CatalogueStore` for tests and local runs without PostgreSQL.
//!
//! Mirrors the relational behavior of the SQL schema: ids come from per-table
//! sequences starting at 1, character inserts require an existing game, and
//! deleting a game clears `game_id` on its characters.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Character, Game, GamePatch, NewCharacter, NewGame};
use super::store::{row_key, CatalogueStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    games: BTreeMap<i32, Game>,
    characters: BTreeMap<i32, Character>,
    game_seq: i32,
    character_seq: i32,
}

#[derive(Debug, Default)]
pub struct MemoryCatalogueStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl CatalogueStore for MemoryCatalogueStore {
    async fn list_games(&self) -> StoreResult<Vec<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.games.values().cloned().collect())
    }

    async fn get_game(&self, id: i64) -> StoreResult<Game> {
        let tables = self.tables.read().await;
        row_key(id)
            .and_then(|key| tables.games.get(&key))
            .cloned()
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    async fn create_game(&self, game: NewGame) -> StoreResult<i32> {
        let mut tables = self.tables.write().await;
        tables.game_seq += 1;
        let id = tables.game_seq;
        tables.games.insert(
            id,
            Game {
                id,
                title: game.title,
                rating: game.rating,
                completed: game.completed,
            },
        );
        Ok(id)
    }

    async fn update_game(&self, id: i64, patch: GamePatch) -> StoreResult<Game> {
        let mut tables = self.tables.write().await;
        let game = match row_key(id) {
            Some(key) => tables.games.get_mut(&key),
            None => None,
        }
        .ok_or_else(|| StoreError::game_not_found(id))?;
        patch.apply(game);
        Ok(game.clone())
    }

    async fn delete_game(&self, id: i64) -> StoreResult<i32> {
        let mut tables = self.tables.write().await;
        let removed = row_key(id)
            .and_then(|key| tables.games.remove(&key))
            .ok_or_else(|| StoreError::game_not_found(id))?;

        // ON DELETE SET NULL
        for character in tables.characters.values_mut() {
            if character.game_id == Some(removed.id) {
                character.game_id = None;
            }
        }
        Ok(removed.id)
    }

    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        let tables = self.tables.read().await;
        Ok(tables.characters.values().cloned().collect())
    }

    async fn get_character(&self, id: i64) -> StoreResult<Character> {
        let tables = self.tables.read().await;
        row_key(id)
            .and_then(|key| tables.characters.get(&key))
            .cloned()
            .ok_or_else(|| StoreError::character_not_found(id))
    }

    async fn list_characters_for_game(&self, game_id: i64) -> StoreResult<Vec<Character>> {
        let tables = self.tables.read().await;
        let key = row_key(game_id)
            .filter(|key| tables.games.contains_key(key))
            .ok_or_else(|| StoreError::game_not_found(game_id))?;

        Ok(tables
            .characters
            .values()
            .filter(|c| c.game_id == Some(key))
            .cloned()
            .collect())
    }

    async fn create_character(&self, character: NewCharacter) -> StoreResult<i32> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(&character.game_id) {
            return Err(StoreError::ForeignKey {
                game_id: character.game_id.into(),
            });
        }

        tables.character_seq += 1;
        let id = tables.character_seq;
        tables.characters.insert(
            id,
            Character {
                id,
                name: character.name,
                fighting: character.fighting,
                intelligence: character.intelligence,
                good: character.good,
                game_id: Some(character.game_id),
            },
        );
        Ok(id)
    }

    async fn delete_character(&self, id: i64) -> StoreResult<i32> {
        let mut tables = self.tables.write().await;
        row_key(id)
            .and_then(|key| tables.characters.remove(&key))
            .map(|c| c.id)
            .ok_or_else(|| StoreError::character_not_found(id))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(title: &str) -> NewGame {
        NewGame {
            title: title.to_string(),
            rating: 8,
            completed: false,
        }
    }

    fn new_character(name: &str, game_id: i32) -> NewCharacter {
        NewCharacter {
            name: name.to_string(),
            fighting: 7,
            intelligence: 5,
            good: false,
            game_id,
        }
    }

    #[tokio::test]
    async fn create_and_list_games_in_id_order() {
        let store = MemoryCatalogueStore::new();
        let first = store.create_game(new_game("Hades")).await.unwrap();
        let second = store.create_game(new_game("Celeste")).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let games = store.list_games().await.unwrap();
        assert_eq!(games.iter().map(|g| g.title.as_str()).collect::<Vec<_>>(), vec!["Hades", "Celeste"]);
    }

    #[tokio::test]
    async fn update_missing_game_is_not_found() {
        let store = MemoryCatalogueStore::new();
        let err = store.update_game(99, GamePatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "game", id: 99 }));
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = MemoryCatalogueStore::new();
        let id = store.create_game(new_game("Hades")).await.unwrap();

        let updated = store
            .update_game(id.into(), GamePatch { rating: Some(10), completed: Some(true) })
            .await
            .unwrap();
        assert_eq!(updated.rating, 10);
        assert!(updated.completed);
        assert_eq!(store.get_game(id.into()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found_the_second_time() {
        let store = MemoryCatalogueStore::new();
        let id = store.create_game(new_game("Hades")).await.unwrap();

        assert_eq!(store.delete_game(id.into()).await.unwrap(), id);
        assert!(matches!(
            store.delete_game(id.into()).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn out_of_range_id_is_not_found() {
        let store = MemoryCatalogueStore::new();
        assert!(matches!(
            store.delete_game(10_000_000_000).await,
            Err(StoreError::NotFound { entity: "game", id: 10_000_000_000 })
        ));
        assert!(matches!(
            store.delete_character(10_000_000_000).await,
            Err(StoreError::NotFound { entity: "character", .. })
        ));
    }

    #[tokio::test]
    async fn character_requires_existing_game() {
        let store = MemoryCatalogueStore::new();
        let err = store.create_character(new_character("Zagreus", 6)).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { game_id: 6 }));
        assert!(store.list_characters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_game_clears_character_reference() {
        let store = MemoryCatalogueStore::new();
        let game_id = store.create_game(new_game("Hades")).await.unwrap();
        let character_id = store.create_character(new_character("Zagreus", game_id)).await.unwrap();

        store.delete_game(game_id.into()).await.unwrap();

        let character = store.get_character(character_id.into()).await.unwrap();
        assert_eq!(character.game_id, None);
    }

    #[tokio::test]
    async fn lists_characters_for_game() {
        let store = MemoryCatalogueStore::new();
        let hades = store.create_game(new_game("Hades")).await.unwrap();
        let celeste = store.create_game(new_game("Celeste")).await.unwrap();
        store.create_character(new_character("Zagreus", hades)).await.unwrap();
        store.create_character(new_character("Madeline", celeste)).await.unwrap();
        store.create_character(new_character("Megaera", hades)).await.unwrap();

        let names: Vec<_> = store
            .list_characters_for_game(hades.into())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Zagreus", "Megaera"]);

        assert!(matches!(
            store.list_characters_for_game(404).await,
            Err(StoreError::NotFound { entity: "game", .. })
        ));
    }
}
