//! Favourite models for the API service

use chrono::{DateTime, Utc};
use common::ids::{FavouriteId, UserId};
use serde::{Deserialize, Serialize};

use super::note::Note;

/// A user's saved reference to a catalog Pokémon, with its notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    pub id: FavouriteId,
    pub user_id: UserId,
    pub pokemon_id: i32,
    pub pokemon_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Newest first
    pub notes: Vec<Note>,
}

/// Request body for adding a favourite
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavouriteRequest {
    pub pokemon_id: i32,
    pub pokemon_name: String,
}

/// Validated favourite insert
#[derive(Debug, Clone)]
pub struct NewFavourite {
    pub user_id: UserId,
    pub pokemon_id: i32,
    pub pokemon_name: String,
}
