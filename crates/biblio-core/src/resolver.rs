//! Resolution engine: turns an identifier (or a partial record) into a displayable entity.
//!
//! Decision order:
//!
//! 1. A remote entity handed in directly is returned as-is.
//! 2. A remote URI is looked up in the current result pool (first exact id match wins);
//!    without a match a minimal stub is synthesized from the URI. No network I/O, no failure.
//! 3. Anything else is a local id and is fetched from the local store. Failures are
//!    reported: an unresolvable local id is a data error, not a cross-source gap.

use crate::api::OntologyApi;
use crate::entity::{Entity, RemoteScheme};
use crate::error::ResolveError;
use std::sync::Arc;

/// What the caller wants displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveTarget {
    Id(String),
    Entity(Entity),
}

impl ResolveTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Entity(e) => e.id(),
        }
    }
}

impl From<&str> for ResolveTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for ResolveTarget {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Entity> for ResolveTarget {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}

pub struct Resolver {
    api: Arc<dyn OntologyApi>,
    scheme: RemoteScheme,
}

impl Resolver {
    pub fn new(api: Arc<dyn OntologyApi>, scheme: RemoteScheme) -> Self {
        Self { api, scheme }
    }

    /// Produces the full entity for `target`, consulting `pool` for remote URIs.
    pub async fn resolve(&self, target: ResolveTarget, pool: &[Entity]) -> Result<Entity, ResolveError> {
        let id = match target {
            ResolveTarget::Entity(entity) if entity.is_remote() => return Ok(entity),
            ResolveTarget::Entity(entity) => entity.id().to_string(),
            ResolveTarget::Id(id) => id,
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(ResolveError::EmptyId);
        }

        if self.scheme.is_remote_uri(id) {
            return Ok(self.resolve_remote(id, pool));
        }

        tracing::debug!(target: "biblio::resolve", id, "Fetching local individual");
        self.api.fetch_individual(id).await.map_err(|source| {
            tracing::warn!(target: "biblio::resolve", id, error = %source, "Local individual could not be loaded");
            ResolveError::LocalFetch {
                id: id.to_string(),
                source,
            }
        })
    }

    /// Pool hit or synthesized stub. Never fails.
    pub fn resolve_remote(&self, uri: &str, pool: &[Entity]) -> Entity {
        match pool.iter().find(|e| e.id() == uri) {
            Some(hit) => hit.clone(),
            None => {
                tracing::debug!(target: "biblio::resolve", uri, "Remote URI not in result pool; synthesizing stub");
                Entity::from_remote_uri(uri)
            }
        }
    }
}
