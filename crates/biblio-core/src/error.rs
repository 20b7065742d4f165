//! Error types for ontology API calls and entity resolution.

use thiserror::Error;

/// Failure talking to the ontology backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Failure producing a displayable entity.
///
/// Remote URIs never produce one of these: they degrade to a synthesized stub instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("empty identifier")]
    EmptyId,

    #[error("could not load local entity '{id}': {source}")]
    LocalFetch {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("relation reference is not navigable: {0}")]
    NotNavigable(String),

    #[error("no entity is selected")]
    NoSelection,

    #[error("selected entity has no relation '{0}'")]
    UnknownRelation(String),

    #[error("index {0} is out of range")]
    IndexOutOfRange(usize),
}
