//! HTTP implementation of [`biblio_core::OntologyApi`] for the library ontology backend.

mod http;

pub use http::HttpOntologyApi;
