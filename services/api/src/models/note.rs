//! Note models for the API service

use chrono::{DateTime, Utc};
use common::ids::{FavouriteId, NoteId};
use serde::{Deserialize, Serialize};

/// Free-text annotation attached to a favourite.
///
/// There is no owner field: a note belongs to whoever owns its favourite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub favourite_id: FavouriteId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or updating a note
#[derive(Debug, Clone, Deserialize)]
pub struct NoteContentRequest {
    pub content: String,
}
