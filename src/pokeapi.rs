use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::catalog::Catalog;
use crate::error::{DexError, FetchTarget, Result};
use crate::types::{ListItem, ListResponse, ListResult, Pokemon, Species};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// PokéAPI over HTTP
pub struct PokeApi {
    client: Client,
    base_url: String,
    artwork_url: String,
}

impl std::fmt::Debug for PokeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PokeApi {
    pub fn new(base_url: &str, artwork_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dex/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DexError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            artwork_url: artwork_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn artwork_for(&self, id: u32) -> String {
        format!("{}/{}.png", self.artwork_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, target: FetchTarget, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DexError::fetch(target.clone(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GET {} returned {}", url, status);
            return Err(DexError::fetch(target, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DexError::fetch(target.clone(), e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("GET {} returned undecodable body: {}", url, e);
            DexError::fetch(target, format!("invalid response: {}", e))
        })
    }
}

#[async_trait]
impl Catalog for PokeApi {
    async fn fetch_list(&self, limit: u32, offset: u32) -> Result<ListResult> {
        let url = self.api_url(&format!("/pokemon?limit={}&offset={}", limit, offset));
        let data: ListResponse = self
            .get_json(FetchTarget::List { limit, offset }, &url)
            .await?;

        let items = data
            .results
            .into_iter()
            .filter_map(|entry| {
                let Some(id) = entry.id() else {
                    tracing::warn!("Skipping list entry without id: {}", entry.url);
                    return None;
                };
                Some(ListItem {
                    id,
                    image_url: self.artwork_for(id),
                    name: entry.name,
                })
            })
            .collect();

        Ok(ListResult {
            items,
            total: data.count,
            next: data.next.map(|_| offset.saturating_add(limit)),
            previous: data.previous.map(|_| offset.saturating_sub(limit)),
        })
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon> {
        let url = self.api_url(&format!("/pokemon/{}", id));
        self.get_json(FetchTarget::Id(id), &url).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Pokemon> {
        let lowered = name.to_lowercase();
        let url = self.api_url(&format!("/pokemon/{}", urlencoding::encode(&lowered)));
        self.get_json(FetchTarget::Name(name.to_string()), &url)
            .await
    }

    async fn fetch_species(&self, id: u32) -> Result<Species> {
        let url = self.api_url(&format!("/pokemon-species/{}", id));
        self.get_json(FetchTarget::Species(id), &url).await
    }
}
