//! Note lifecycle
//!
//! Notes carry no owner of their own; every operation authorizes against the
//! parent favourite's owner.

use common::ids::{FavouriteId, NoteId};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::Principal,
    models::Note,
    ownership::OwnershipResolver,
    repositories::Store,
    validation::validate_note_content,
};

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn Store>,
    resolver: OwnershipResolver,
}

impl NoteService {
    pub fn new(store: Arc<dyn Store>, resolver: OwnershipResolver) -> Self {
        Self { store, resolver }
    }

    /// Notes of a favourite owned by the principal, newest first
    pub async fn list_for_favourite(
        &self,
        principal: &Principal,
        favourite_id: FavouriteId,
    ) -> ApiResult<Vec<Note>> {
        self.resolver
            .check_favourite(principal, favourite_id)
            .await?;
        Ok(self.store.list_notes(favourite_id).await?)
    }

    /// Attach a note to a favourite owned by the principal
    pub async fn add_note(
        &self,
        principal: &Principal,
        favourite_id: FavouriteId,
        content: &str,
    ) -> ApiResult<Note> {
        let content = validate_note_content(content)?;
        self.resolver
            .check_favourite(principal, favourite_id)
            .await?;

        // The favourite can be deleted between the check and the insert
        let note = self
            .store
            .insert_note(favourite_id, &content)
            .await
            .map_err(|e| {
                if e.is_foreign_key_violation() {
                    ApiError::NotFound(format!("Favourite with ID {}", favourite_id))
                } else {
                    ApiError::Database(e)
                }
            })?;

        info!(user_id = %principal.user_id, favourite_id = %favourite_id, note_id = %note.id, "Note added");
        Ok(note)
    }

    /// Read a single note owned by the principal
    pub async fn get_note(&self, principal: &Principal, note_id: NoteId) -> ApiResult<Note> {
        self.resolver.check_note(principal, note_id).await?;
        self.store
            .find_note(note_id)
            .await?
            .ok_or_else(|| note_not_found(note_id))
    }

    /// Replace the content of a note owned by the principal
    pub async fn update_note(
        &self,
        principal: &Principal,
        note_id: NoteId,
        content: &str,
    ) -> ApiResult<Note> {
        let content = validate_note_content(content)?;
        self.resolver.check_note(principal, note_id).await?;

        let note = self
            .store
            .update_note(note_id, &content)
            .await?
            .ok_or_else(|| note_not_found(note_id))?;

        info!(user_id = %principal.user_id, note_id = %note_id, "Note updated");
        Ok(note)
    }

    /// Delete a note owned by the principal
    pub async fn remove_note(&self, principal: &Principal, note_id: NoteId) -> ApiResult<()> {
        self.resolver.check_note(principal, note_id).await?;

        if !self.store.delete_note(note_id).await? {
            return Err(note_not_found(note_id));
        }

        info!(user_id = %principal.user_id, note_id = %note_id, "Note removed");
        Ok(())
    }
}

fn note_not_found(id: NoteId) -> ApiError {
    ApiError::NotFound(format!("Note with ID {}", id))
}
