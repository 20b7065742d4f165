//! biblio-core: client-side core of the library ontology browser.
//!
//! Holds the entity model, relation-reference parsing, the resolution engine that turns
//! any identifier into a displayable [`Entity`], the search orchestrator, and the single
//! browsing [`Session`] (one result pool, at most one selected entity).
//!
//! The HTTP API of the ontology backend is reached only through the [`OntologyApi`] trait;
//! `biblio-client` provides the reqwest implementation.

mod api;
mod catalog;
mod entity;
mod error;
mod relation;
mod resolver;
mod search;
mod session;
mod shared;

pub use api::{ClassListing, OntologyApi, Translations};
pub use catalog::{Catalog, CatalogStats};
pub use entity::{Entity, EntityCategory, Origin, RemoteScheme, WireEntity, WireEnvelope, EXTERNAL_RESOURCE_KIND};
pub use error::{ApiError, ResolveError};
pub use relation::{parse_reference, RelationRef};
pub use resolver::{ResolveTarget, Resolver};
pub use search::{ResultEnvelope, SearchOrchestrator, SearchRequest, LOCAL_SEARCH_PATH, REMOTE_SEARCH_PATH};
pub use session::{Session, SessionEvent};
pub use shared::{BrowserConfig, DEFAULT_ANY_CATEGORY, DEFAULT_LOCALE, SUPPORTED_LOCALES};

#[cfg(test)]
pub(crate) mod testing;
