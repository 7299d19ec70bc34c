//! Ownership resolution for favourites and notes
//!
//! A favourite is owned by its `user_id`; a note is owned by whoever owns its
//! parent favourite. Existence is always checked before ownership, so an
//! absent resource yields `NotFound` for every caller and `Forbidden` is only
//! ever returned for a resource that exists.

use common::ids::{FavouriteId, NoteId, UserId};
use std::sync::Arc;
use tracing::warn;

use crate::{
    error::{ApiError, ApiResult},
    middleware::Principal,
    repositories::Store,
};

/// Grants access only when the principal is the owner
pub fn authorize(principal: UserId, owner: UserId) -> ApiResult<()> {
    if principal == owner {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Looks up resource owners. Read-only and uncached.
#[derive(Clone)]
pub struct OwnershipResolver {
    store: Arc<dyn Store>,
}

impl OwnershipResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Owning user of a favourite
    pub async fn resolve_favourite_owner(&self, id: FavouriteId) -> ApiResult<UserId> {
        self.store
            .favourite_owner(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Favourite with ID {}", id)))
    }

    /// Owning user of a note, through its parent favourite
    pub async fn resolve_note_owner(&self, id: NoteId) -> ApiResult<UserId> {
        self.store
            .note_owner(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Note with ID {}", id)))
    }

    /// Resolve then authorize access to a favourite
    pub async fn check_favourite(&self, principal: &Principal, id: FavouriteId) -> ApiResult<()> {
        let owner = self.resolve_favourite_owner(id).await?;
        authorize(principal.user_id, owner).inspect_err(|_| {
            warn!(user_id = %principal.user_id, favourite_id = %id, "Favourite access denied");
        })
    }

    /// Resolve then authorize access to a note
    pub async fn check_note(&self, principal: &Principal, id: NoteId) -> ApiResult<()> {
        let owner = self.resolve_note_owner(id).await?;
        authorize(principal.user_id, owner).inspect_err(|_| {
            warn!(user_id = %principal.user_id, note_id = %id, "Note access denied");
        })
    }
}
