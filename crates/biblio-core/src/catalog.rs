//! Class listings, dashboard counts and localized labels.
//!
//! None of this resolves entities; it is the plain data fetching a front end needs
//! around the session.

use crate::api::{ClassListing, OntologyApi, Translations};
use crate::entity::Entity;
use crate::error::ApiError;
use crate::shared::BrowserConfig;
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// Item counts per dashboard listing, in dashboard order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub counts: Vec<(ClassListing, usize)>,
}

impl CatalogStats {
    pub fn count(&self, listing: ClassListing) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == listing)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

pub struct Catalog {
    api: Arc<dyn OntologyApi>,
}

impl Catalog {
    pub fn new(api: Arc<dyn OntologyApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self, listing: ClassListing) -> Result<Vec<Entity>, ApiError> {
        self.api.list_class(listing).await
    }

    /// Fetches the dashboard listings concurrently. A listing that fails counts as zero.
    pub async fn stats(&self) -> CatalogStats {
        let listings = ClassListing::dashboard();
        let results = join_all(listings.iter().map(|l| self.api.list_class(*l))).await;
        let counts = listings
            .into_iter()
            .zip(results)
            .map(|(listing, result)| match result {
                Ok(items) => (listing, items.len()),
                Err(e) => {
                    tracing::warn!(target: "biblio::catalog", listing = listing.path(), error = %e, "Listing unavailable");
                    (listing, 0)
                }
            })
            .collect();
        CatalogStats { counts }
    }

    /// Localized labels for `locale`. Unsupported locales and failures give an empty table,
    /// so labels fall back to ontology names.
    pub async fn translations(&self, locale: &str) -> Translations {
        if !BrowserConfig::is_supported_locale(locale) {
            tracing::warn!(target: "biblio::catalog", locale, "Unsupported locale; using ontology names");
            return Translations::default();
        }
        match self.api.translations(locale).await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(target: "biblio::catalog", locale, error = %e, "Translations unavailable");
                Translations::default()
            }
        }
    }
}
