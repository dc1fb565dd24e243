pub mod character;
pub mod list;

pub use character::{delete as character_delete, get as character_get};
pub use list::{create as characters_create, get as characters_get};
