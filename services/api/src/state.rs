//! Application state shared across handlers

use common::jwt::JwtService;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    catalog::CatalogClient,
    ownership::OwnershipResolver,
    repositories::{PgStore, Store},
    services::{FavouriteService, NoteService, UserService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present in production; used for the health endpoint
    pub db_pool: Option<PgPool>,
    pub jwt_service: JwtService,
    pub favourites: FavouriteService,
    pub notes: NoteService,
    pub users: UserService,
    pub catalog: CatalogClient,
}

impl AppState {
    /// Wire the services over an arbitrary store
    pub fn new(store: Arc<dyn Store>, jwt_service: JwtService, catalog: CatalogClient) -> Self {
        let resolver = OwnershipResolver::new(store.clone());
        Self {
            db_pool: None,
            jwt_service,
            favourites: FavouriteService::new(store.clone(), resolver.clone()),
            notes: NoteService::new(store.clone(), resolver),
            users: UserService::new(store),
            catalog,
        }
    }

    /// Wire the services over PostgreSQL
    pub fn with_pool(pool: PgPool, jwt_service: JwtService, catalog: CatalogClient) -> Self {
        let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
        Self {
            db_pool: Some(pool),
            ..Self::new(store, jwt_service, catalog)
        }
    }
}
