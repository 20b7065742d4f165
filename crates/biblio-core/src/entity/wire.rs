//! JSON shapes returned by the ontology backend and their conversion into [`Entity`].
//!
//! The backend uses three record shapes for the same individual:
//!
//! | Endpoint | Fields |
//! |----------|--------|
//! | search (`/buscador`, `/buscador/online`) | `id`, `tipo`, `nombre_mostrar`, `descripcion`, `origen`, `imagen` |
//! | detail (`/individuos/{id}`) | `nombre`, `clase`, `datos`, `relaciones` |
//! | class listing (`/libros`, ...) | `id`, `tipo`, `datos`, `relaciones` |
//!
//! [`WireEntity`] accepts all of them; `datos`/`relaciones` values may be a string or a list.

use super::{Entity, Origin, RemoteScheme, UNKNOWN_KIND};
use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Placeholder the backend sends when DBpedia has no comment for a resource.
const NO_DESCRIPTION: &str = "Sin descripción";

/// Search response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(default)]
    pub cantidad: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resultados: Vec<WireEntity>,
}

/// One individual as the backend serializes it. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub nombre_mostrar: Option<String>,
    #[serde(default)]
    pub clase: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub origen: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub datos: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relaciones: BTreeMap<String, serde_json::Value>,
}

impl WireEntity {
    /// Builds the entity, deciding its origin once. Fails only when the record has no id.
    pub fn into_entity(self, scheme: &RemoteScheme) -> Result<Entity, ApiError> {
        let id = non_empty(self.id)
            .or_else(|| non_empty(self.nombre.clone()))
            .ok_or_else(|| ApiError::Decode("entity record has neither 'id' nor 'nombre'".to_string()))?;

        let origin = Origin::classify(self.origen.as_deref(), &id, scheme);
        let attributes: BTreeMap<String, Vec<String>> = self
            .datos
            .iter()
            .map(|(k, v)| (k.clone(), value_strings(v)))
            .collect();

        let display_name = non_empty(self.nombre_mostrar)
            .or_else(|| non_empty(self.nombre))
            .or_else(|| first_value(&attributes, "titulo"))
            .or_else(|| first_value(&attributes, "nombre"))
            .unwrap_or_else(|| id.clone());
        let kind = non_empty(self.clase)
            .or_else(|| non_empty(self.tipo))
            .unwrap_or_else(|| UNKNOWN_KIND.to_string());

        let mut entity = match origin {
            Origin::Local => Entity::local(id, display_name, kind),
            Origin::Remote => Entity::remote(id, display_name, kind),
        };
        let description = non_empty(self.descripcion);

        match origin {
            Origin::Local => {
                // Local search hits carry match details in `descripcion`.
                let mut attributes = attributes;
                if let Some(d) = description {
                    attributes.entry("descripcion".to_string()).or_insert_with(|| vec![d]);
                }
                for (name, values) in attributes {
                    entity = entity.with_attribute(name, values);
                }
                for (name, value) in &self.relaciones {
                    entity = entity.with_relation(name.clone(), value_strings(value));
                }
            }
            Origin::Remote => {
                for (name, values) in attributes {
                    entity = entity.with_attribute(name, values);
                }
                if let Some(d) = description.filter(|d| d != NO_DESCRIPTION) {
                    entity = entity.with_description(d);
                }
                if let Some(img) = non_empty(self.imagen) {
                    entity = entity.with_image(img);
                }
            }
        }
        Ok(entity)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn first_value(attributes: &BTreeMap<String, Vec<String>>, key: &str) -> Option<String> {
    attributes
        .get(key)
        .and_then(|values| values.first())
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

/// Flattens a `datos`/`relaciones` value into strings. Scalars become one-element lists.
fn value_strings(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(value_strings).collect(),
        other => vec![other.to_string()],
    }
}
