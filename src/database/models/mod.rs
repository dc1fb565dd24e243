pub mod character;
pub mod game;

pub use character::{Character, NewCharacter};
pub use game::{Game, GamePatch, NewGame};
