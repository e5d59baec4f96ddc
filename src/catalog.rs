use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ListResult, Pokemon, Species};

/// Read-only access to the Pokémon catalog.
///
/// The app only sees this trait, so the HTTP client can be swapped for a
/// fake in tests.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// One page of the catalog, `limit` entries starting at `offset`
    async fn fetch_list(&self, limit: u32, offset: u32) -> Result<ListResult>;
    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon>;
    /// Case-insensitive lookup by name
    async fn fetch_by_name(&self, name: &str) -> Result<Pokemon>;
    async fn fetch_species(&self, id: u32) -> Result<Species>;

    /// `fetch_by_id` enriched with the species' varieties.
    ///
    /// Enrichment is best effort: when the species request fails the base
    /// record is returned unchanged and the failure is only logged.
    async fn fetch_with_variants(&self, id: u32) -> Result<Pokemon> {
        let mut pokemon = self.fetch_by_id(id).await?;

        match self.fetch_species(id).await {
            Ok(species) => pokemon.varieties = Some(species.varieties),
            Err(e) => {
                tracing::warn!("Failed to fetch species data for pokemon {}: {}", id, e);
            }
        }

        Ok(pokemon)
    }
}
