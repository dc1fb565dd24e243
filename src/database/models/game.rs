use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i32,
    pub title: String,
    pub rating: i32,
    pub completed: bool,
}

/// Validated fields for a game insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub title: String,
    pub rating: i32,
    pub completed: bool,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    pub rating: Option<i32>,
    pub completed: Option<bool>,
}

impl GamePatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.completed.is_none()
    }

    pub fn apply(&self, game: &mut Game) {
        if let Some(rating) = self.rating {
            game.rating = rating;
        }
        if let Some(completed) = self.completed {
            game.completed = completed;
        }
    }
}
