//! Search orchestration: builds the outbound query and normalizes the result envelope.
//!
//! Search failures are never surfaced. A transport or decoding error is logged and
//! reported as an empty result set so the caller renders "no results".

use crate::api::OntologyApi;
use crate::entity::{Entity, RemoteScheme, WireEnvelope};
use crate::error::ApiError;
use crate::shared::{BrowserConfig, DEFAULT_ANY_CATEGORY};
use serde::Serialize;
use std::sync::Arc;

pub const LOCAL_SEARCH_PATH: &str = "/buscador";
pub const REMOTE_SEARCH_PATH: &str = "/buscador/online";

/// A fully built outbound search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    /// Class filter; always `None` for federated searches.
    pub category: Option<String>,
    pub remote: bool,
    pub locale: String,
}

impl SearchRequest {
    /// Applies the filter rules: federated searches are never filtered by class, and the
    /// `any_category` sentinel (or an empty category) means no filter.
    pub fn build(query: &str, category: Option<&str>, use_remote: bool, locale: &str, any_category: &str) -> Self {
        let category = if use_remote {
            None
        } else {
            category
                .map(str::trim)
                .filter(|c| !c.is_empty() && *c != any_category)
                .map(str::to_string)
        };
        Self {
            query: query.to_string(),
            category,
            remote: use_remote,
            locale: locale.to_string(),
        }
    }

    pub fn path(&self) -> &'static str {
        if self.remote {
            REMOTE_SEARCH_PATH
        } else {
            LOCAL_SEARCH_PATH
        }
    }

    /// Query-string pairs in the order the backend documents them: `q`, `clase`, `lang`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.query.clone())];
        if let Some(c) = &self.category {
            pairs.push(("clase", c.clone()));
        }
        pairs.push(("lang", self.locale.clone()));
        pairs
    }
}

/// Normalized search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultEnvelope {
    pub count: usize,
    pub items: Vec<Entity>,
}

impl ResultEnvelope {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn decode(wire: WireEnvelope, scheme: &RemoteScheme) -> Result<Self, ApiError> {
        let items = wire
            .resultados
            .into_iter()
            .map(|w| w.into_entity(scheme))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            count: wire.cantidad.unwrap_or(items.len()),
            items,
        })
    }
}

/// Issues searches against the backend and hands back decoded result envelopes.
pub struct SearchOrchestrator {
    api: Arc<dyn OntologyApi>,
    scheme: RemoteScheme,
    any_category: String,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn OntologyApi>, scheme: RemoteScheme) -> Self {
        Self {
            api,
            scheme,
            any_category: DEFAULT_ANY_CATEGORY.to_string(),
        }
    }

    pub fn from_config(api: Arc<dyn OntologyApi>, config: &BrowserConfig) -> Self {
        Self {
            api,
            scheme: RemoteScheme::new(config.remote_uri_prefix.clone()),
            any_category: config.any_category.clone(),
        }
    }

    pub fn request(&self, query: &str, category: Option<&str>, use_remote: bool, locale: &str) -> SearchRequest {
        SearchRequest::build(query, category, use_remote, locale, &self.any_category)
    }

    /// Runs a search. Never fails: errors yield an empty envelope.
    pub async fn search(&self, query: &str, category: Option<&str>, use_remote: bool, locale: &str) -> ResultEnvelope {
        let request = self.request(query, category, use_remote, locale);
        tracing::debug!(
            target: "biblio::search",
            query = %request.query,
            category = ?request.category,
            remote = request.remote,
            locale = %request.locale,
            "Search started"
        );
        let outcome = match self.api.search(&request).await {
            Ok(wire) => ResultEnvelope::decode(wire, &self.scheme),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(envelope) => {
                tracing::info!(target: "biblio::search", count = envelope.count, remote = request.remote, "Search finished");
                envelope
            }
            Err(e) => {
                tracing::warn!(target: "biblio::search", error = %e, query = %request.query, "Search failed; showing no results");
                ResultEnvelope::empty()
            }
        }
    }
}
