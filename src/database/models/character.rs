use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i32,
    pub name: String,
    pub fighting: i32,
    pub intelligence: i32,
    pub good: bool,
    /// Cleared when the owning game is deleted
    pub game_id: Option<i32>,
}

/// Validated fields for a character insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub fighting: i32,
    pub intelligence: i32,
    pub good: bool,
    pub game_id: i32,
}
