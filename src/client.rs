// 🌐 Remote Data Source - read-only client for the creature catalogue API
// The trait is the seam: the accumulator and the overlay only see `CatalogueSource`

use crate::error::{FetchError, FetchResult};
use crate::model::{Entry, EntryResponse, ListResponse, SpeciesResponse, Summary, TypeDetailResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// SOURCE TRAIT
// ============================================================================

#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// One page of summaries: `GET /pokemon?limit=L&offset=O`
    async fn list_page(&self, offset: usize, limit: usize) -> FetchResult<Vec<Summary>>;

    /// Full entry behind a summary's detail URL
    async fn entry_at(&self, url: &str) -> FetchResult<Entry>;

    /// Full entry addressed by identifier: `GET /pokemon/{id}`
    async fn entry_by_id(&self, id: u32) -> FetchResult<Entry>;

    /// Category (egg group) names: `GET /pokemon-species/{id}/`
    async fn categories(&self, id: u32) -> FetchResult<Vec<String>>;

    /// Names of the types that deal double damage to the type at `type_url`
    async fn double_damage_from(&self, type_url: &str) -> FetchResult<Vec<String>>;
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogueSource for PokeApiClient {
    async fn list_page(&self, offset: usize, limit: usize) -> FetchResult<Vec<Summary>> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset);
        let page: ListResponse = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn entry_at(&self, url: &str) -> FetchResult<Entry> {
        let raw: EntryResponse = self.get_json(url).await?;
        Ok(raw.into())
    }

    async fn entry_by_id(&self, id: u32) -> FetchResult<Entry> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        self.entry_at(&url).await
    }

    async fn categories(&self, id: u32) -> FetchResult<Vec<String>> {
        let url = format!("{}/pokemon-species/{}/", self.base_url, id);
        let species: SpeciesResponse = self.get_json(&url).await?;
        Ok(species.egg_groups.into_iter().map(|g| g.name).collect())
    }

    async fn double_damage_from(&self, type_url: &str) -> FetchResult<Vec<String>> {
        let detail: TypeDetailResponse = self.get_json(type_url).await?;
        Ok(detail
            .damage_relations
            .double_damage_from
            .into_iter()
            .map(|t| t.name)
            .collect())
    }
}
