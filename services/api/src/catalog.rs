//! Read-only client for the external Pokémon catalog (PokeAPI)
//!
//! Responses are reshaped for the browser client and, when a Redis pool is
//! configured, cached for `cache_ttl` seconds. Cache failures never fail a
//! request; they are logged and the upstream is queried instead.

use common::cache::RedisPool;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Pokemon, PokemonListItem, PokemonListResponse, PokemonStat};

const ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Moves kept per Pokémon
const MAX_MOVES: usize = 10;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised by the catalog collaborator
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Pokemon {0} not found")]
    NotFound(i32),

    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected catalog response: {0}")]
    InvalidResponse(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Deserialize)]
struct ApiPokemon {
    id: i32,
    name: String,
    #[serde(default)]
    types: Vec<ApiTypeSlot>,
    #[serde(default)]
    stats: Vec<ApiStat>,
    #[serde(default)]
    moves: Vec<ApiMoveSlot>,
}

#[derive(Debug, Deserialize)]
struct ApiTypeSlot {
    #[serde(rename = "type")]
    kind: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiStat {
    base_stat: i32,
    stat: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiMoveSlot {
    #[serde(rename = "move")]
    inner: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    results: Vec<ApiPageEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiPageEntry {
    name: String,
    url: String,
}

fn artwork_url(id: i32) -> String {
    format!("{}/{}.png", ARTWORK_BASE_URL, id)
}

fn to_pokemon(raw: ApiPokemon) -> CatalogResult<Pokemon> {
    if raw.id <= 0 || raw.name.is_empty() {
        return Err(CatalogError::InvalidResponse(
            "Pokemon entry without id or name".to_string(),
        ));
    }

    Ok(Pokemon {
        id: raw.id,
        img_url: artwork_url(raw.id),
        name: raw.name,
        pokemon_type: raw
            .types
            .into_iter()
            .next()
            .map(|slot| slot.kind.name)
            .unwrap_or_else(|| "unknown".to_string()),
        stats: raw
            .stats
            .into_iter()
            .map(|s| PokemonStat {
                name: s.stat.name,
                value: s.base_stat,
            })
            .collect(),
        moves: raw
            .moves
            .into_iter()
            .take(MAX_MOVES)
            .map(|m| m.inner.name)
            .collect(),
    })
}

/// Catalog ids only appear as the last path segment of the entry URL
fn id_from_url(url: &str) -> Option<i32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

fn to_list_item(entry: ApiPageEntry) -> CatalogResult<PokemonListItem> {
    let id = id_from_url(&entry.url).ok_or_else(|| {
        CatalogError::InvalidResponse(format!("No id in catalog URL {}", entry.url))
    })?;

    Ok(PokemonListItem {
        id,
        name: entry.name,
        url: entry.url,
        img_url: artwork_url(id),
    })
}

/// Clamp paging parameters to what the catalog proxy serves
pub fn page_bounds(offset: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (offset.unwrap_or(0), limit)
}

/// Catalog client
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    cache: Option<RedisPool>,
    cache_ttl: u64,
}

impl CatalogClient {
    pub fn new(base_url: &str, cache: Option<RedisPool>, cache_ttl: u64) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        })
    }

    /// A single Pokémon by catalog id
    pub async fn get_pokemon(&self, id: i32) -> CatalogResult<Pokemon> {
        if id <= 0 {
            return Err(CatalogError::NotFound(id));
        }

        let key = format!("pokemon:{}", id);
        if let Some(pokemon) = self.cached::<Pokemon>(&key).await {
            return Ok(pokemon);
        }

        let response = self
            .http
            .get(format!("{}/pokemon/{}", self.base_url, id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }

        let raw: ApiPokemon = response.error_for_status()?.json().await?;
        let pokemon = to_pokemon(raw)?;

        self.store(&key, &pokemon).await;
        Ok(pokemon)
    }

    /// One page of the catalog listing
    pub async fn list_pokemon(&self, offset: u32, limit: u32) -> CatalogResult<PokemonListResponse> {
        let key = format!("pokemon:list:{}:{}", offset, limit);
        if let Some(page) = self.cached::<PokemonListResponse>(&key).await {
            return Ok(page);
        }

        let raw: ApiPage = self
            .http
            .get(format!("{}/pokemon", self.base_url))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let results = raw
            .results
            .into_iter()
            .map(to_list_item)
            .collect::<CatalogResult<Vec<_>>>()?;

        let page = PokemonListResponse {
            results,
            offset,
            limit,
        };

        self.store(&key, &page).await;
        Ok(page)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache.as_ref()?;

        match cache.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    debug!("Catalog cache hit: {}", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("Discarding unreadable catalog cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Catalog cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store<T: serde::Serialize>(&self, key: &str, value: &T) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize catalog entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = cache.set(key, &json, Some(self.cache_ttl)).await {
            warn!("Catalog cache write failed for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pikachu_json() -> serde_json::Value {
        let moves: Vec<_> = (0..15)
            .map(|i| json!({ "move": { "name": format!("move-{}", i) } }))
            .collect();
        json!({
            "id": 25,
            "name": "pikachu",
            "types": [{ "slot": 1, "type": { "name": "electric" } }],
            "stats": [
                { "base_stat": 35, "stat": { "name": "hp" } },
                { "base_stat": 90, "stat": { "name": "speed" } }
            ],
            "moves": moves
        })
    }

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/151"), Some(151));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (0, DEFAULT_PAGE_SIZE));
        assert_eq!(page_bounds(Some(40), Some(0)), (40, 1));
        assert_eq!(page_bounds(Some(0), Some(500)), (0, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_mapping_defaults_missing_type() {
        let raw: ApiPokemon = serde_json::from_value(json!({ "id": 132, "name": "ditto" })).unwrap();
        let pokemon = to_pokemon(raw).unwrap();
        assert_eq!(pokemon.pokemon_type, "unknown");
        assert!(pokemon.stats.is_empty());
        assert!(pokemon.moves.is_empty());
        assert!(pokemon.img_url.ends_with("/132.png"));
    }

    #[tokio::test]
    async fn test_get_pokemon_maps_upstream_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu_json()))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), None, 60).unwrap();
        let pokemon = client.get_pokemon(25).await.unwrap();

        assert_eq!(pokemon.id, 25);
        assert_eq!(pokemon.name, "pikachu");
        assert_eq!(pokemon.pokemon_type, "electric");
        assert_eq!(pokemon.stats[1], PokemonStat { name: "speed".to_string(), value: 90 });
        assert_eq!(pokemon.moves.len(), MAX_MOVES);
        assert_eq!(pokemon.moves[0], "move-0");
    }

    #[tokio::test]
    async fn test_unknown_pokemon_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/99999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), None, 60).unwrap();
        assert!(matches!(
            client.get_pokemon(99999).await,
            Err(CatalogError::NotFound(99999))
        ));
        assert!(matches!(
            client.get_pokemon(0).await,
            Err(CatalogError::NotFound(0))
        ));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), None, 60).unwrap();
        assert!(matches!(client.get_pokemon(1).await, Err(CatalogError::Http(_))));
    }

    #[tokio::test]
    async fn test_list_pokemon_forwards_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("offset", "20"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1302,
                "results": [
                    { "name": "spearow", "url": "https://pokeapi.co/api/v2/pokemon/21/" },
                    { "name": "fearow", "url": "https://pokeapi.co/api/v2/pokemon/22/" }
                ]
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::new(&server.uri(), None, 60).unwrap();
        let page = client.list_pokemon(20, 2).await.unwrap();

        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 2);
        let ids: Vec<_> = page.results.iter().map(|p| p.id).collect();
        assert_eq!(ids, [21, 22]);
        assert_eq!(page.results[1].name, "fearow");
    }
}
