//! The seam to the ontology backend's HTTP API.

use crate::entity::{Entity, WireEnvelope};
use crate::error::ApiError;
use crate::search::SearchRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operations the core needs from the ontology backend. Implemented over HTTP by
/// `biblio-client`; tests use in-memory fakes.
#[async_trait::async_trait]
pub trait OntologyApi: Send + Sync {
    /// Runs a local or federated search and returns the raw envelope.
    async fn search(&self, request: &SearchRequest) -> Result<WireEnvelope, ApiError>;

    /// Loads the full record of a local individual by id.
    async fn fetch_individual(&self, id: &str) -> Result<Entity, ApiError>;

    /// Lists every individual of a class.
    async fn list_class(&self, listing: ClassListing) -> Result<Vec<Entity>, ApiError>;

    /// Localized labels for class and property names.
    async fn translations(&self, locale: &str) -> Result<Translations, ApiError>;
}

/// Class listings exposed by the backend as `GET /{path}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassListing {
    Books,
    Journals,
    Users,
    Students,
    Teachers,
    Librarians,
    Publishers,
}

impl ClassListing {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Books => "libros",
            Self::Journals => "revistas",
            Self::Users => "usuarios",
            Self::Students => "estudiantes",
            Self::Teachers => "docentes",
            Self::Librarians => "bibliotecarios",
            Self::Publishers => "editoriales",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Books => "Libros",
            Self::Journals => "Revistas",
            Self::Users => "Usuarios",
            Self::Students => "Estudiantes",
            Self::Teachers => "Docentes",
            Self::Librarians => "Bibliotecarios",
            Self::Publishers => "Editoriales",
        }
    }

    /// Accepts the backend path (`libros`) or the variant name (`books`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|l| l.path() == s || format!("{:?}", l).to_lowercase() == s)
    }

    pub fn all() -> [Self; 7] {
        [
            Self::Books,
            Self::Journals,
            Self::Users,
            Self::Students,
            Self::Teachers,
            Self::Librarians,
            Self::Publishers,
        ]
    }

    /// The listings counted on the dashboard.
    pub fn dashboard() -> [Self; 5] {
        [
            Self::Books,
            Self::Students,
            Self::Teachers,
            Self::Journals,
            Self::Librarians,
        ]
    }
}

/// Localized labels keyed by ontology class or property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }

    /// Label for `key`, or the key itself when no translation exists.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.0.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
