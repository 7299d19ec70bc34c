//! User profile lookups

use common::ids::UserId;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    middleware::Principal,
    models::ProfileResponse,
    ownership::authorize,
    repositories::Store,
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The principal's own profile with favourites and notes
    pub async fn profile(&self, principal: &Principal) -> ApiResult<ProfileResponse> {
        let user = self
            .store
            .find_user(principal.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

        let favourites = self.store.list_favourites(user.id).await?;

        Ok(ProfileResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            favourites,
        })
    }

    /// A profile by ID; only the principal's own is visible
    pub async fn get(&self, principal: &Principal, id: UserId) -> ApiResult<ProfileResponse> {
        authorize(principal.user_id, id)?;
        self.profile(principal).await
    }
}
