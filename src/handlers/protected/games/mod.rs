pub mod characters;
pub mod game;
pub mod list;

pub use characters::get as game_characters_get;
pub use game::{delete as game_delete, get as game_get, patch as game_patch};
pub use list::{create as games_create, get as games_get};
