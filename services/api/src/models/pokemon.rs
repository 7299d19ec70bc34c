//! Catalog models, shaped for the browser client

use serde::{Deserialize, Serialize};

/// A single Pokémon as served to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: i32,
    pub name: String,
    pub img_url: String,
    /// Primary type, or "unknown"
    #[serde(rename = "type")]
    pub pokemon_type: String,
    pub stats: Vec<PokemonStat>,
    /// At most the first ten moves
    pub moves: Vec<String>,
}

/// Base stat entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub value: i32,
}

/// Entry in a catalog listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonListItem {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub img_url: String,
}

/// Query parameters for catalog listing
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonListQuery {
    /// Number of entries to skip
    pub offset: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Response for catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonListResponse {
    pub results: Vec<PokemonListItem>,
    pub offset: u32,
    pub limit: u32,
}
