//! Favourite lifecycle

use common::{
    error::DatabaseError,
    ids::{FavouriteId, UserId},
};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::Principal,
    models::{CreateFavouriteRequest, Favourite, NewFavourite},
    ownership::OwnershipResolver,
    repositories::{FAVOURITE_UNIQUE_CONSTRAINT, Store},
    validation::validate_favourite,
};

#[derive(Clone)]
pub struct FavouriteService {
    store: Arc<dyn Store>,
    resolver: OwnershipResolver,
}

impl FavouriteService {
    pub fn new(store: Arc<dyn Store>, resolver: OwnershipResolver) -> Self {
        Self { store, resolver }
    }

    /// All favourites of a user with their notes, most recent first
    pub async fn list_for_user(&self, user_id: UserId) -> ApiResult<Vec<Favourite>> {
        Ok(self.store.list_favourites(user_id).await?)
    }

    /// Add a catalog item to the user's favourites.
    ///
    /// A concurrent insert that slips past the existence check is caught by
    /// the store's uniqueness constraint and reported the same way.
    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateFavouriteRequest,
    ) -> ApiResult<Favourite> {
        let pokemon_name = validate_favourite(request.pokemon_id, &request.pokemon_name)?;

        if self
            .store
            .find_favourite_by_pokemon(user_id, request.pokemon_id)
            .await?
            .is_some()
        {
            return Err(already_favourite());
        }

        let new = NewFavourite {
            user_id,
            pokemon_id: request.pokemon_id,
            pokemon_name,
        };

        let favourite = self
            .store
            .insert_favourite(&new)
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(ref constraint)
                    if constraint == FAVOURITE_UNIQUE_CONSTRAINT =>
                {
                    already_favourite()
                }
                other => ApiError::Database(other),
            })?;

        info!(
            user_id = %user_id,
            favourite_id = %favourite.id,
            pokemon_id = favourite.pokemon_id,
            "Favourite created"
        );
        Ok(favourite)
    }

    /// Find a favourite by ID regardless of owner
    pub async fn get_by_id(&self, id: FavouriteId) -> ApiResult<Favourite> {
        self.store
            .find_favourite(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Favourite with ID {}", id)))
    }

    /// Find a favourite owned by the principal
    pub async fn get_owned(&self, principal: &Principal, id: FavouriteId) -> ApiResult<Favourite> {
        self.resolver.check_favourite(principal, id).await?;
        self.get_by_id(id).await
    }

    /// Delete a favourite owned by the principal, together with its notes
    pub async fn remove(&self, principal: &Principal, id: FavouriteId) -> ApiResult<()> {
        self.resolver.check_favourite(principal, id).await?;

        // Gone between the ownership check and the delete
        if !self.store.delete_favourite(id).await? {
            return Err(ApiError::NotFound(format!("Favourite with ID {}", id)));
        }

        info!(user_id = %principal.user_id, favourite_id = %id, "Favourite removed");
        Ok(())
    }
}

fn already_favourite() -> ApiError {
    ApiError::Conflict("Pokemon already in favourites".to_string())
}
