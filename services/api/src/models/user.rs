//! User models for the API service

use chrono::{DateTime, Utc};
use common::ids::UserId;
use serde::Serialize;

use super::favourite::Favourite;

/// Registered user, without credential material
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for the profile endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub favourites: Vec<Favourite>,
}
