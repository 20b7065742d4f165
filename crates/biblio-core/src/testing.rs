//! In-memory ontology backend for unit tests.

use crate::api::{ClassListing, OntologyApi, Translations};
use crate::entity::{Entity, WireEnvelope};
use crate::error::ApiError;
use crate::search::SearchRequest;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeApi {
    individuals: HashMap<String, Entity>,
    fetch_delays: HashMap<String, Duration>,
    search_envelopes: HashMap<String, WireEnvelope>,
    default_envelope: Option<WireEnvelope>,
    search_delays: HashMap<String, Duration>,
    fail_search: bool,
    listings: HashMap<ClassListing, Vec<Entity>>,
    translations: HashMap<String, Translations>,
    search_log: Mutex<Vec<SearchRequest>>,
    fetch_log: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_individual(mut self, entity: Entity) -> Self {
        self.individuals.insert(entity.id().to_string(), entity);
        self
    }

    pub fn with_fetch_delay(mut self, id: &str, delay: Duration) -> Self {
        self.fetch_delays.insert(id.to_string(), delay);
        self
    }

    /// Envelope returned for every query without a specific one.
    pub fn with_search_envelope(mut self, envelope: WireEnvelope) -> Self {
        self.default_envelope = Some(envelope);
        self
    }

    pub fn with_search_for(mut self, query: &str, envelope: WireEnvelope, delay: Duration) -> Self {
        self.search_envelopes.insert(query.to_string(), envelope);
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn with_listing(mut self, listing: ClassListing, items: Vec<Entity>) -> Self {
        self.listings.insert(listing, items);
        self
    }

    pub fn with_translations(mut self, locale: &str, translations: Translations) -> Self {
        self.translations.insert(locale.to_string(), translations);
        self
    }

    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.search_log.lock().unwrap().clone()
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OntologyApi for FakeApi {
    async fn search(&self, request: &SearchRequest) -> Result<WireEnvelope, ApiError> {
        self.search_log.lock().unwrap().push(request.clone());
        if let Some(delay) = self.search_delays.get(&request.query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_search {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(self
            .search_envelopes
            .get(&request.query)
            .or(self.default_envelope.as_ref())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_individual(&self, id: &str) -> Result<Entity, ApiError> {
        self.fetch_log.lock().unwrap().push(id.to_string());
        if let Some(delay) = self.fetch_delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        self.individuals.get(id).cloned().ok_or_else(|| ApiError::Status {
            status: 404,
            body: format!("individual '{}' not found", id),
        })
    }

    async fn list_class(&self, listing: ClassListing) -> Result<Vec<Entity>, ApiError> {
        self.listings
            .get(&listing)
            .cloned()
            .ok_or_else(|| ApiError::Transport(format!("{} unavailable", listing.path())))
    }

    async fn translations(&self, locale: &str) -> Result<Translations, ApiError> {
        self.translations.get(locale).cloned().ok_or_else(|| ApiError::Status {
            status: 400,
            body: "Idioma no soportado".to_string(),
        })
    }
}
