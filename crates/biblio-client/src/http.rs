//! reqwest client for the ontology backend.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | local search | `GET /buscador?q=&clase=&lang=` |
//! | federated search | `GET /buscador/online?q=&lang=` |
//! | entity detail | `GET /individuos/{id}` |
//! | class listing | `GET /{clase}` |
//! | localization | `GET /config/idioma/{locale}` |

use biblio_core::{
    ApiError, BrowserConfig, ClassListing, Entity, OntologyApi, RemoteScheme, SearchRequest, Translations,
    WireEntity, WireEnvelope,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpOntologyApi {
    client: Client,
    base_url: Url,
    scheme: RemoteScheme,
}

impl HttpOntologyApi {
    /// Creates a client for the backend at `base_url`. `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, scheme: RemoteScheme, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidConfig(format!("bad api_base '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!("api_base '{}' cannot carry paths", base_url)));
        }

        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            scheme,
        })
    }

    pub fn from_config(config: &BrowserConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base,
            RemoteScheme::new(config.remote_uri_prefix.clone()),
            config.request_timeout(),
        )
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(target: "biblio::http", url = %url, "GET");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Transport(format!("request to {} timed out", url))
            } else if e.is_connect() {
                ApiError::Transport(format!("connection to {} failed: {}", url, e))
            } else {
                ApiError::Transport(format!("request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("reading body from {} failed: {}", url, e)))?;

        if !status.is_success() {
            tracing::debug!(target: "biblio::http", url = %url, status = status.as_u16(), "Backend returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl OntologyApi for HttpOntologyApi {
    async fn search(&self, request: &SearchRequest) -> Result<WireEnvelope, ApiError> {
        let segments: Vec<&str> = request.path().split('/').filter(|s| !s.is_empty()).collect();
        let mut url = self.url(&segments);
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        self.get_json(url).await
    }

    async fn fetch_individual(&self, id: &str) -> Result<Entity, ApiError> {
        let wire: WireEntity = self.get_json(self.url(&["individuos", id])).await?;
        wire.into_entity(&self.scheme)
    }

    async fn list_class(&self, listing: ClassListing) -> Result<Vec<Entity>, ApiError> {
        let wire: Vec<WireEntity> = self.get_json(self.url(&[listing.path()])).await?;
        wire.into_iter().map(|w| w.into_entity(&self.scheme)).collect()
    }

    async fn translations(&self, locale: &str) -> Result<Translations, ApiError> {
        self.get_json(self.url(&["config", "idioma", locale])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use biblio_core::{Origin, Session, SessionEvent};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn buscador(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        Json(json!({
            "cantidad": 1,
            "resultados": [{
                "id": "autor_borges",
                "tipo": "Autor",
                "nombre_mostrar": format!("q={} clase={} lang={}",
                    params.get("q").map(String::as_str).unwrap_or("-"),
                    params.get("clase").map(String::as_str).unwrap_or("-"),
                    params.get("lang").map(String::as_str).unwrap_or("-")),
                "descripcion": "Coincidencia en ID",
                "origen": "Local",
                "imagen": null
            }]
        }))
    }

    async fn buscador_online(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        let has_clase = params.contains_key("clase");
        Json(json!({
            "cantidad": 2,
            "resultados": [
                {
                    "id": "autor_borges",
                    "tipo": "Autor",
                    "nombre_mostrar": "Jorge Luis Borges",
                    "descripcion": "Coincidencia en ID",
                    "origen": "Local",
                    "imagen": null
                },
                {
                    "id": "http://dbpedia.org/resource/Jorge_Luis_Borges",
                    "tipo": "Person",
                    "nombre_mostrar": if has_clase { "unexpected clase" } else { "Jorge Luis Borges" },
                    "descripcion": format!("lang={}", params.get("lang").map(String::as_str).unwrap_or("-")),
                    "origen": "DBpedia",
                    "imagen": "http://commons.wikimedia.org/borges.jpg"
                }
            ]
        }))
    }

    async fn individuo(Path(id): Path<String>) -> impl IntoResponse {
        match id.as_str() {
            "libro_ficciones" | "libro con espacios" => (
                StatusCode::OK,
                Json(json!({
                    "nombre": id,
                    "clase": "Libro",
                    "datos": { "titulo": ["Ficciones"], "anio": ["1944"] },
                    "relaciones": { "escritoPor": ["Jorge Luis Borges (ID: autor_borges)"] }
                })),
            )
                .into_response(),
            "roto" => (StatusCode::OK, "{not json").into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Individuo no encontrado" }))).into_response(),
        }
    }

    async fn libros() -> Json<serde_json::Value> {
        Json(json!([
            { "id": "libro_ficciones", "tipo": "Libro", "datos": { "titulo": ["Ficciones"] }, "relaciones": {} },
            { "id": "libro_rayuela", "tipo": "Libro", "datos": { "titulo": ["Rayuela"] }, "relaciones": {} }
        ]))
    }

    async fn idioma(Path(lang): Path<String>) -> impl IntoResponse {
        if lang == "en" {
            (StatusCode::OK, Json(json!({ "Libro": "Book", "escritoPor": "written by" }))).into_response()
        } else {
            (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Idioma no soportado" }))).into_response()
        }
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/buscador", get(buscador))
            .route("/buscador/online", get(buscador_online))
            .route("/individuos/:id", get(individuo))
            .route("/libros", get(libros))
            .route("/config/idioma/:lang", get(idioma));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn client() -> HttpOntologyApi {
        HttpOntologyApi::new(&spawn_backend().await, RemoteScheme::default(), Some(Duration::from_secs(5))).unwrap()
    }

    /// Address with nothing listening on it.
    async fn dead_address() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn local_search_sends_filter_and_locale() {
        let api = client().await;
        let request = SearchRequest::build("borges", Some("Autor"), false, "en", "Todo");
        let envelope = api.search(&request).await.unwrap();
        assert_eq!(envelope.cantidad, Some(1));
        assert_eq!(
            envelope.resultados[0].nombre_mostrar.as_deref(),
            Some("q=borges clase=Autor lang=en")
        );
    }

    #[tokio::test]
    async fn any_category_request_has_no_clase_param() {
        let api = client().await;
        let request = SearchRequest::build("borges", Some("Todo"), false, "es", "Todo");
        let envelope = api.search(&request).await.unwrap();
        assert_eq!(
            envelope.resultados[0].nombre_mostrar.as_deref(),
            Some("q=borges clase=- lang=es")
        );
    }

    #[tokio::test]
    async fn federated_search_hits_online_endpoint() {
        let api = client().await;
        let request = SearchRequest::build("borges", Some("Autor"), true, "fr", "Todo");
        let envelope = api.search(&request).await.unwrap();
        assert_eq!(envelope.cantidad, Some(2));
        let remote = &envelope.resultados[1];
        assert_eq!(remote.nombre_mostrar.as_deref(), Some("Jorge Luis Borges"));
        assert_eq!(remote.descripcion.as_deref(), Some("lang=fr"));
    }

    #[tokio::test]
    async fn fetches_and_decodes_individual() {
        let api = client().await;
        let entity = api.fetch_individual("libro_ficciones").await.unwrap();
        assert_eq!(entity.id(), "libro_ficciones");
        assert_eq!(entity.kind(), "Libro");
        assert_eq!(entity.origin(), Origin::Local);
        assert_eq!(entity.attributes()["anio"], vec!["1944"]);
        let links = entity.relation_links();
        assert_eq!(links["escritoPor"][0].target_id.as_deref(), Some("autor_borges"));
    }

    #[tokio::test]
    async fn individual_id_is_sent_as_one_path_segment() {
        let api = client().await;
        let entity = api.fetch_individual("libro con espacios").await.unwrap();
        assert_eq!(entity.id(), "libro con espacios");
        assert!(matches!(
            api.fetch_individual("a/b").await.unwrap_err(),
            ApiError::Status { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn missing_individual_is_a_status_error() {
        let api = client().await;
        let err = api.fetch_individual("book-42").await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("no encontrado"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let api = client().await;
        assert!(matches!(api.fetch_individual("roto").await.unwrap_err(), ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let api = HttpOntologyApi::new(&dead_address().await, RemoteScheme::default(), None).unwrap();
        assert!(matches!(
            api.fetch_individual("libro_ficciones").await.unwrap_err(),
            ApiError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn lists_class_and_loads_translations() {
        let api = client().await;
        let books = api.list_class(ClassListing::Books).await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].display_name(), "Rayuela");

        let labels = api.translations("en").await.unwrap();
        assert_eq!(labels.label("Libro"), "Book");
        assert!(matches!(
            api.translations("pt").await.unwrap_err(),
            ApiError::Status { status: 400, .. }
        ));
        assert!(matches!(
            api.list_class(ClassListing::Journals).await.unwrap_err(),
            ApiError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpOntologyApi::new("not a url", RemoteScheme::default(), None),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            HttpOntologyApi::new("mailto:someone@example.org", RemoteScheme::default(), None),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn session_over_http_resolves_pool_entries_and_local_relations() {
        let api: Arc<dyn OntologyApi> = Arc::new(client().await);
        let session = Session::new(api, &BrowserConfig::default());

        let envelope = session.search("borges", None, true, Some("es")).await;
        assert_eq!(envelope.count, 2);

        let remote = session.select_from_pool(1).await.unwrap().unwrap();
        assert_eq!(remote.origin(), Origin::Remote);
        assert_eq!(remote.image(), Some("http://commons.wikimedia.org/borges.jpg"));

        let mut rx = session.subscribe();
        let book = session.navigate_to("libro_ficciones").await.unwrap().unwrap();
        assert_eq!(book.display_name(), "libro_ficciones");
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SelectionChanged(None));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SelectionChanged(Some(book)));
    }

    #[tokio::test]
    async fn search_against_unreachable_backend_shows_no_results() {
        let api: Arc<dyn OntologyApi> =
            Arc::new(HttpOntologyApi::new(&dead_address().await, RemoteScheme::default(), None).unwrap());
        let session = Session::new(api, &BrowserConfig::default());
        let envelope = session.search("x", None, false, Some("es")).await;
        assert_eq!(envelope.count, 0);
        assert!(envelope.items.is_empty());
        assert!(!session.is_searching());
    }
}
