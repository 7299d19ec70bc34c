//! In-memory store used by unit tests
//!
//! Mirrors the PostgreSQL schema's guarantees: sequential ids, the
//! `(user_id, pokemon_id)` uniqueness constraint and note cascade on
//! favourite deletion.

use async_trait::async_trait;
use chrono::Utc;
use common::{
    error::{DatabaseError, DatabaseResult},
    ids::{FavouriteId, NoteId, UserId},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{FAVOURITE_UNIQUE_CONSTRAINT, NOTE_FAVOURITE_FOREIGN_KEY, Store};
use crate::models::{Favourite, NewFavourite, Note, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    favourites: BTreeMap<FavouriteId, Favourite>,
    notes: BTreeMap<NoteId, Note>,
    next_favourite_id: i64,
    next_note_id: i64,
}

impl Tables {
    fn notes_of(&self, favourite_id: FavouriteId) -> Vec<Note> {
        self.notes
            .values()
            .rev()
            .filter(|note| note.favourite_id == favourite_id)
            .cloned()
            .collect()
    }

    fn with_notes(&self, favourite: &Favourite) -> Favourite {
        let mut favourite = favourite.clone();
        favourite.notes = self.notes_of(favourite.id);
        favourite
    }
}

/// Store holding everything in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user directly, bypassing the auth service
    pub async fn add_user(&self, id: i64, username: &str) -> UserId {
        let now = Utc::now();
        let user = User {
            id: UserId(id),
            username: username.to_string(),
            name: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.users.insert(user.id, user);
        UserId(id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: UserId) -> DatabaseResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn favourite_owner(&self, id: FavouriteId) -> DatabaseResult<Option<UserId>> {
        Ok(self
            .tables
            .lock()
            .await
            .favourites
            .get(&id)
            .map(|f| f.user_id))
    }

    async fn note_owner(&self, id: NoteId) -> DatabaseResult<Option<UserId>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notes
            .get(&id)
            .and_then(|note| tables.favourites.get(&note.favourite_id))
            .map(|f| f.user_id))
    }

    async fn list_favourites(&self, user_id: UserId) -> DatabaseResult<Vec<Favourite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .favourites
            .values()
            .rev()
            .filter(|f| f.user_id == user_id)
            .map(|f| tables.with_notes(f))
            .collect())
    }

    async fn find_favourite(&self, id: FavouriteId) -> DatabaseResult<Option<Favourite>> {
        let tables = self.tables.lock().await;
        Ok(tables.favourites.get(&id).map(|f| tables.with_notes(f)))
    }

    async fn find_favourite_by_pokemon(
        &self,
        user_id: UserId,
        pokemon_id: i32,
    ) -> DatabaseResult<Option<Favourite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .favourites
            .values()
            .find(|f| f.user_id == user_id && f.pokemon_id == pokemon_id)
            .cloned())
    }

    async fn insert_favourite(&self, new: &NewFavourite) -> DatabaseResult<Favourite> {
        let mut tables = self.tables.lock().await;

        let duplicate = tables
            .favourites
            .values()
            .any(|f| f.user_id == new.user_id && f.pokemon_id == new.pokemon_id);
        if duplicate {
            return Err(DatabaseError::UniqueViolation(
                FAVOURITE_UNIQUE_CONSTRAINT.to_string(),
            ));
        }

        tables.next_favourite_id += 1;
        let now = Utc::now();
        let favourite = Favourite {
            id: FavouriteId(tables.next_favourite_id),
            user_id: new.user_id,
            pokemon_id: new.pokemon_id,
            pokemon_name: new.pokemon_name.clone(),
            created_at: now,
            updated_at: now,
            notes: Vec::new(),
        };
        tables.favourites.insert(favourite.id, favourite.clone());
        Ok(favourite)
    }

    async fn delete_favourite(&self, id: FavouriteId) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.favourites.remove(&id).is_none() {
            return Ok(false);
        }
        tables.notes.retain(|_, note| note.favourite_id != id);
        Ok(true)
    }

    async fn list_notes(&self, favourite_id: FavouriteId) -> DatabaseResult<Vec<Note>> {
        Ok(self.tables.lock().await.notes_of(favourite_id))
    }

    async fn find_note(&self, id: NoteId) -> DatabaseResult<Option<Note>> {
        Ok(self.tables.lock().await.notes.get(&id).cloned())
    }

    async fn insert_note(&self, favourite_id: FavouriteId, content: &str) -> DatabaseResult<Note> {
        let mut tables = self.tables.lock().await;
        if !tables.favourites.contains_key(&favourite_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                NOTE_FAVOURITE_FOREIGN_KEY.to_string(),
            ));
        }

        tables.next_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: NoteId(tables.next_note_id),
            favourite_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, content: &str) -> DatabaseResult<Option<Note>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.notes.get_mut(&id).map(|note| {
            note.content = content.to_string();
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn delete_note(&self, id: NoteId) -> DatabaseResult<bool> {
        Ok(self.tables.lock().await.notes.remove(&id).is_some())
    }
}
