//! Success payloads. Each serializes to a JSON object that `ApiResponse`
//! flattens next to `"success": true`.

use serde::Serialize;

use crate::database::models::{Character, Game};

#[derive(Debug, Serialize)]
pub struct GameList {
    pub games: Vec<Game>,
}

#[derive(Debug, Serialize)]
pub struct GameDetail {
    pub game: Game,
}

#[derive(Debug, Serialize)]
pub struct GameCreated {
    pub game_id: i32,
}

/// PATCH reports the title of the game it touched
#[derive(Debug, Serialize)]
pub struct GameUpdated {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct GameDeleted {
    pub game_id: i32,
}

#[derive(Debug, Serialize)]
pub struct GameCharacters {
    pub game_id: i32,
    pub characters: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct CharacterList {
    pub characters: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct CharacterDetail {
    pub character: Character,
}

#[derive(Debug, Serialize)]
pub struct CharacterCreated {
    pub character_id: i32,
}

#[derive(Debug, Serialize)]
pub struct CharacterDeleted {
    pub character_id: i32,
}

/// Body of `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}
