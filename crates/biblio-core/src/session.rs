//! Browsing session: the current result pool, the single inspected entity, and the
//! sequencing rules for moving between them.
//!
//! Every asynchronous operation takes a token from a per-slot counter when it starts
//! (one counter for the pool, one for the selection). When it completes, its result is
//! applied only if no newer operation on that slot has started since. Superseded work is
//! not cancelled; its result is dropped.
//!
//! Front ends observe changes through [`Session::subscribe`]. Events are sent while the
//! state lock is held, so their order matches the order of state changes.

use crate::api::OntologyApi;
use crate::entity::{Entity, RemoteScheme};
use crate::error::ResolveError;
use crate::relation::parse_reference;
use crate::resolver::{ResolveTarget, Resolver};
use crate::search::{ResultEnvelope, SearchOrchestrator};
use crate::shared::BrowserConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// State change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The inspected entity changed (`None` = detail view closed).
    SelectionChanged(Option<Entity>),
    /// A search result replaced the pool.
    PoolReplaced { count: usize },
    /// The searching indicator flipped.
    Searching(bool),
    /// The newest selection request failed; the detail view should show an error.
    ResolveFailed { id: String, error: ResolveError },
}

#[derive(Debug, Default)]
struct SessionState {
    pool: Arc<ResultEnvelope>,
    selection: Option<Entity>,
    in_flight_searches: usize,
    pool_token: u64,
    selection_token: u64,
}

pub struct Session {
    resolver: Resolver,
    searcher: SearchOrchestrator,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    settle: Option<Duration>,
    default_locale: String,
}

impl Session {
    pub fn new(api: Arc<dyn OntologyApi>, config: &BrowserConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            resolver: Resolver::new(Arc::clone(&api), RemoteScheme::new(config.remote_uri_prefix.clone())),
            searcher: SearchOrchestrator::from_config(api, config),
            state: Mutex::new(SessionState::default()),
            events,
            settle: config.navigation_settle(),
            default_locale: config.default_locale.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn current_selection(&self) -> Option<Entity> {
        self.state().selection.clone()
    }

    pub fn current_pool(&self) -> Arc<ResultEnvelope> {
        Arc::clone(&self.state().pool)
    }

    /// True while at least one search is outstanding.
    pub fn is_searching(&self) -> bool {
        self.state().in_flight_searches > 0
    }

    /// Runs a search and installs the result as the pool unless a newer search started
    /// in the meantime. Returns what this search produced either way.
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
        use_remote: bool,
        locale: Option<&str>,
    ) -> Arc<ResultEnvelope> {
        let locale = locale.unwrap_or(&self.default_locale);
        let (token, _guard) = {
            let mut state = self.state();
            state.pool_token += 1;
            state.in_flight_searches += 1;
            if state.in_flight_searches == 1 {
                self.emit(SessionEvent::Searching(true));
            }
            (state.pool_token, SearchGuard { session: self })
        };

        let envelope = Arc::new(self.searcher.search(query, category, use_remote, locale).await);

        {
            let mut state = self.state();
            if state.pool_token == token {
                state.pool = Arc::clone(&envelope);
                self.emit(SessionEvent::PoolReplaced { count: envelope.count });
            } else {
                tracing::debug!(target: "biblio::session", query, "Discarding results of superseded search");
            }
        }
        envelope
    }

    /// Resolves `target` and makes it the selection. An open selection is cleared first
    /// and the scheduler gets a chance to tear the old view down before `target` is
    /// resolved. Returns `Ok(None)` when a newer selection request overtook this one.
    pub async fn select(&self, target: impl Into<ResolveTarget>) -> Result<Option<Entity>, ResolveError> {
        let token = self.begin_selection();

        match self.settle {
            Some(pause) => tokio::time::sleep(pause).await,
            None => tokio::task::yield_now().await,
        }

        self.resolve_and_apply(token, target.into()).await
    }

    /// Moves from the current selection to `id`, typically a relation target.
    pub async fn navigate_to(&self, id: &str) -> Result<Option<Entity>, ResolveError> {
        self.select(ResolveTarget::Id(id.to_string())).await
    }

    /// Closes the detail view. Any selection still resolving is discarded on arrival.
    pub fn close(&self) {
        self.begin_selection();
    }

    /// Selects the `index`-th item of the current pool. Remote items are shown as they
    /// came in; local ones are fetched in full.
    pub async fn select_from_pool(&self, index: usize) -> Result<Option<Entity>, ResolveError> {
        let item = self
            .current_pool()
            .items
            .get(index)
            .cloned()
            .ok_or(ResolveError::IndexOutOfRange(index))?;
        self.select(item).await
    }

    /// Follows the `index`-th value of `relation` on the selected entity.
    pub async fn follow_relation(&self, relation: &str, index: usize) -> Result<Option<Entity>, ResolveError> {
        let selected = self.current_selection().ok_or(ResolveError::NoSelection)?;
        let values = selected
            .relations()
            .get(relation)
            .ok_or_else(|| ResolveError::UnknownRelation(relation.to_string()))?;
        let raw = values.get(index).ok_or(ResolveError::IndexOutOfRange(index))?;
        let reference = parse_reference(raw);
        match reference.target_id {
            Some(target) => self.navigate_to(&target).await,
            None => Err(ResolveError::NotNavigable(reference.label)),
        }
    }

    async fn resolve_and_apply(&self, token: u64, target: ResolveTarget) -> Result<Option<Entity>, ResolveError> {
        let id = target.id().to_string();
        let pool = self.current_pool();
        let outcome = self.resolver.resolve(target, &pool.items).await;

        let mut state = self.state();
        if state.selection_token != token {
            tracing::debug!(target: "biblio::session", id = %id, "Discarding superseded resolution");
            return outcome.map(|_| None);
        }
        match outcome {
            Ok(entity) => {
                state.selection = Some(entity.clone());
                self.emit(SessionEvent::SelectionChanged(Some(entity.clone())));
                Ok(Some(entity))
            }
            Err(error) => {
                self.emit(SessionEvent::ResolveFailed {
                    id,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Takes a fresh selection token and clears any open selection.
    fn begin_selection(&self) -> u64 {
        let mut state = self.state();
        state.selection_token += 1;
        if state.selection.take().is_some() {
            self.emit(SessionEvent::SelectionChanged(None));
        }
        state.selection_token
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

/// Keeps the in-flight search count honest even if the search future is dropped.
struct SearchGuard<'a> {
    session: &'a Session,
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.session.state();
        state.in_flight_searches = state.in_flight_searches.saturating_sub(1);
        if state.in_flight_searches == 0 {
            self.session.emit(SessionEvent::Searching(false));
        }
    }
}
