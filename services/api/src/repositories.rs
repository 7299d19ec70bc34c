//! Persistence boundary for the API service
//!
//! The core never talks to PostgreSQL directly; it goes through [`Store`].
//! Implementations must enforce uniqueness of `(user_id, pokemon_id)` on
//! favourites and cascade favourite deletion to its notes, reporting a
//! uniqueness failure as [`common::error::DatabaseError::UniqueViolation`].

use async_trait::async_trait;
use common::{
    error::DatabaseResult,
    ids::{FavouriteId, NoteId, UserId},
};

use crate::models::{Favourite, NewFavourite, Note, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Name of the favourites uniqueness constraint
pub const FAVOURITE_UNIQUE_CONSTRAINT: &str = "uq_favourites_user_pokemon";

/// Name of the foreign key from notes to their favourite
pub const NOTE_FAVOURITE_FOREIGN_KEY: &str = "fk_notes_favourite";

/// Point queries and mutations over users, favourites and notes
#[async_trait]
pub trait Store: Send + Sync {
    /// Find a user by ID
    async fn find_user(&self, id: UserId) -> DatabaseResult<Option<User>>;

    /// Owning user of a favourite
    async fn favourite_owner(&self, id: FavouriteId) -> DatabaseResult<Option<UserId>>;

    /// Owning user of a note, resolved through its parent favourite
    async fn note_owner(&self, id: NoteId) -> DatabaseResult<Option<UserId>>;

    /// All favourites of a user with their notes, newest first
    async fn list_favourites(&self, user_id: UserId) -> DatabaseResult<Vec<Favourite>>;

    /// Find a favourite with its notes
    async fn find_favourite(&self, id: FavouriteId) -> DatabaseResult<Option<Favourite>>;

    /// Find the favourite a user holds for a catalog item
    async fn find_favourite_by_pokemon(
        &self,
        user_id: UserId,
        pokemon_id: i32,
    ) -> DatabaseResult<Option<Favourite>>;

    /// Insert a favourite; returns it with an empty notes list
    async fn insert_favourite(&self, new: &NewFavourite) -> DatabaseResult<Favourite>;

    /// Delete a favourite and its notes; false if no row matched
    async fn delete_favourite(&self, id: FavouriteId) -> DatabaseResult<bool>;

    /// Notes of a favourite, newest first
    async fn list_notes(&self, favourite_id: FavouriteId) -> DatabaseResult<Vec<Note>>;

    /// Find a note by ID
    async fn find_note(&self, id: NoteId) -> DatabaseResult<Option<Note>>;

    /// Insert a note under a favourite
    async fn insert_note(&self, favourite_id: FavouriteId, content: &str) -> DatabaseResult<Note>;

    /// Replace a note's content and bump its timestamp; `None` if no row matched
    async fn update_note(&self, id: NoteId, content: &str) -> DatabaseResult<Option<Note>>;

    /// Delete a note; false if no row matched
    async fn delete_note(&self, id: NoteId) -> DatabaseResult<bool>;
}
