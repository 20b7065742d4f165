//! Displayable ontology individuals (books, people, publishers, DBpedia resources).
//!
//! An [`Entity`] is built once, from wire data or by synthesis, and never edited afterwards.
//! Its [`Origin`] is decided at that point and governs which fields are meaningful:
//! relations exist only on local entities, image and description only on remote ones.

mod wire;

pub use wire::{WireEntity, WireEnvelope};

use crate::relation::{parse_reference, RelationRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind given to remote entities synthesized from a bare URI.
pub const EXTERNAL_RESOURCE_KIND: &str = "DBpedia Resource";

const UNKNOWN_KIND: &str = "Desconocido";

/// Where an entity's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The local ontology store.
    Local,
    /// The federated linked-data source (DBpedia).
    Remote,
}

impl Origin {
    /// Classifies a wire record from its `origen` marker, falling back to the id shape.
    pub fn classify(origen: Option<&str>, id: &str, scheme: &RemoteScheme) -> Self {
        match origen.map(str::trim) {
            Some(o) if o.eq_ignore_ascii_case("local") => Self::Local,
            Some(o) if o.to_ascii_lowercase().contains("dbpedia") => Self::Remote,
            _ if scheme.is_remote_uri(id) => Self::Remote,
            _ => Self::Local,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Remote => "DBpedia",
        }
    }
}

/// Recognizes federated resource URIs by their fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteScheme {
    prefix: String,
}

impl RemoteScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// The prefix must end on a path boundary of `id`.
    pub fn is_remote_uri(&self, id: &str) -> bool {
        if self.prefix.is_empty() {
            return false;
        }
        match id.strip_prefix(self.prefix.as_str()) {
            Some(rest) => self.prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl Default for RemoteScheme {
    fn default() -> Self {
        Self::new("http://dbpedia.org")
    }
}

/// Coarse classification of an entity's kind, used by front ends for badges and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Book,
    Student,
    Teacher,
    Author,
    Publisher,
    Journal,
    Librarian,
    Person,
    Place,
    Organisation,
    Other,
}

impl EntityCategory {
    /// Maps a free-form kind (local class name or DBpedia type) onto a category.
    pub fn from_kind(kind: &str) -> Self {
        let k = kind.to_lowercase();
        if k.contains("libro") || k == "book" {
            Self::Book
        } else if k.contains("estudiante") {
            Self::Student
        } else if k.contains("docente") {
            Self::Teacher
        } else if k.contains("autor") {
            Self::Author
        } else if k.contains("editorial") {
            Self::Publisher
        } else if k.contains("revista") {
            Self::Journal
        } else if k.contains("bibliotecario") {
            Self::Librarian
        } else if k == "person" {
            Self::Person
        } else if k == "place" {
            Self::Place
        } else if k == "organisation" || k == "organization" {
            Self::Organisation
        } else {
            Self::Other
        }
    }
}

/// One displayable ontology individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    id: String,
    display_name: String,
    kind: String,
    origin: Origin,
    attributes: BTreeMap<String, Vec<String>>,
    relations: BTreeMap<String, Vec<String>>,
    image: Option<String>,
    description: Option<String>,
}

impl Entity {
    /// A local entity with no attributes or relations yet.
    pub fn local(id: impl Into<String>, display_name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: kind.into(),
            origin: Origin::Local,
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
            image: None,
            description: None,
        }
    }

    /// A remote entity with the given name and kind.
    pub fn remote(id: impl Into<String>, display_name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            origin: Origin::Remote,
            ..Self::local(id, display_name, kind)
        }
    }

    /// Minimal remote entity derived from a URI alone: the last path segment becomes the
    /// name (underscores read as spaces).
    pub fn from_remote_uri(uri: &str) -> Self {
        let segment = uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .unwrap_or(uri);
        Self::remote(uri, segment.replace('_', " "), EXTERNAL_RESOURCE_KIND)
    }

    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a relation. Ignored on remote entities.
    pub fn with_relation<I, S>(mut self, name: impl Into<String>, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.origin == Origin::Local {
            self.relations
                .insert(name.into(), refs.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Sets the image. Ignored on local entities.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        if self.origin == Origin::Remote {
            self.image = Some(image.into());
        }
        self
    }

    /// Sets the description. Ignored on local entities.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        if self.origin == Origin::Remote {
            self.description = Some(description.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.origin == Origin::Remote
    }

    pub fn attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.attributes
    }

    /// Raw relation values by relation name. Always empty for remote entities.
    pub fn relations(&self) -> &BTreeMap<String, Vec<String>> {
        &self.relations
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> EntityCategory {
        EntityCategory::from_kind(&self.kind)
    }

    /// Link to the entity's page in the federated source, when it has one.
    pub fn external_url(&self) -> Option<&str> {
        (self.is_remote() && self.id.starts_with("http")).then_some(self.id.as_str())
    }

    /// Relation values parsed into labels and navigable targets, order preserved.
    pub fn relation_links(&self) -> BTreeMap<&str, Vec<RelationRef>> {
        self.relations
            .iter()
            .map(|(name, values)| (name.as_str(), values.iter().map(|v| parse_reference(v)).collect()))
            .collect()
    }

    /// Attributes as a detail view shows them. Remote entities carry no `datos`, so their
    /// summary fields are presented instead.
    pub fn detail_attributes(&self) -> BTreeMap<String, Vec<String>> {
        if !self.is_remote() {
            return self.attributes.clone();
        }
        let mut out = BTreeMap::new();
        out.insert("tipo".to_string(), vec![self.kind.clone()]);
        if let Some(d) = &self.description {
            out.insert("descripcion".to_string(), vec![d.clone()]);
        }
        out.insert("origen".to_string(), vec![self.origin.label().to_string()]);
        if let Some(url) = self.external_url() {
            out.insert("url_dbpedia".to_string(), vec![url.to_string()]);
        }
        out
    }
}
