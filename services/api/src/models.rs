//! API models for request and response payloads

pub mod favourite;
pub mod note;
pub mod pokemon;
pub mod user;

pub use favourite::{CreateFavouriteRequest, Favourite, NewFavourite};
pub use note::{Note, NoteContentRequest};
pub use pokemon::{Pokemon, PokemonListItem, PokemonListQuery, PokemonListResponse, PokemonStat};
pub use user::{ProfileResponse, User};
