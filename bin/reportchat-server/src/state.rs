//! Shared application state injected into every Axum handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reportchat_core::SessionState;
use reportchat_core::analysis::AnalysisRun;
use reportchat_core::chat::ChatTurn;
use reportchat_core::service::{
    Authenticator, ChatResponder, MessageStore, ReportGenerator, SessionService,
};
use reportchat_core::session::SessionManager;
use uuid::Uuid;

use crate::config::Config;
use crate::entities::SqliteStore;
use crate::render::Renderer;

/// Per-visit session state, keyed by the visit cookie.
///
/// Handlers never hold a lock across an await: they [`checkout`] an owned
/// copy at the start of a render pass and [`commit`] it at the end. Only
/// non-default state is stored, so anonymous traffic (health checks, assets,
/// the login page) leaves no entry behind.
///
/// [`checkout`]: VisitRegistry::checkout
/// [`commit`]: VisitRegistry::commit
pub struct VisitRegistry {
    visits: Mutex<HashMap<Uuid, SessionState>>,
}

impl std::fmt::Debug for VisitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VisitRegistry({} visits)", self.len())
    }
}

impl Default for VisitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitRegistry {
    pub fn new() -> Self {
        Self { visits: Mutex::new(HashMap::new()) }
    }

    /// Owned copy of the visit's state for one render pass. An unknown visit
    /// gets freshly initialised state without being stored.
    pub fn checkout(&self, id: Uuid) -> SessionState {
        let mut slot = self.visits.lock().ok().and_then(|v| v.get(&id).cloned());
        SessionManager::init_session(&mut slot).clone()
    }

    /// Store `state` for `id`. Default state removes the entry instead.
    pub fn commit(&self, id: Uuid, state: SessionState) {
        if let Ok(mut visits) = self.visits.lock() {
            if state == SessionState::default() {
                visits.remove(&id);
            } else {
                visits.insert(id, state);
            }
        }
    }

    pub fn forget(&self, id: Uuid) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.remove(&id);
        }
    }

    /// Number of visits with stored state.
    pub fn len(&self) -> usize {
        self.visits.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collaborators behind the page flows.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn Authenticator>,
    pub sessions: Arc<dyn SessionService>,
    pub messages: Arc<dyn MessageStore>,
    pub responder: Arc<dyn ChatResponder>,
    pub reports: Arc<dyn ReportGenerator>,
}

impl Services {
    /// All storage served by one SQLite store.
    pub fn sqlite(
        store: Arc<SqliteStore>,
        responder: Arc<dyn ChatResponder>,
        reports: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            auth: store.clone(),
            sessions: store.clone(),
            messages: store,
            responder,
            reports,
        }
    }
}

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    pub visits: Arc<VisitRegistry>,
    pub renderer: Arc<Renderer>,
    pub auth: Arc<dyn Authenticator>,
    pub messages: Arc<dyn MessageStore>,
    pub sessions: SessionManager,
    pub chat: ChatTurn,
    pub analysis: AnalysisRun,
}

impl AppState {
    /// Wire the collaborators into the page flows.
    pub fn new(config: Config, services: Services) -> Result<Self, minijinja::Error> {
        let renderer = Renderer::new(config.branding.clone())?;
        let Services { auth, sessions, messages, responder, reports } = services;
        Ok(Self {
            config: Arc::new(config),
            visits: Arc::new(VisitRegistry::new()),
            renderer: Arc::new(renderer),
            auth,
            sessions: SessionManager::new(sessions),
            chat: ChatTurn::new(messages.clone(), responder),
            analysis: AnalysisRun::new(messages.clone(), reports),
            messages,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("visits", &self.visits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn checkout_of_unknown_visit_is_default_and_not_stored() {
        let registry = VisitRegistry::new();
        assert_eq!(registry.checkout(Uuid::new_v4()), SessionState::default());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn committed_state_survives_checkout() {
        let registry = VisitRegistry::new();
        let id = Uuid::new_v4();
        let mut state = registry.checkout(id);
        state.current_report_text = Some("r".into());
        registry.commit(id, state);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.checkout(id).current_report_text.as_deref(), Some("r"));
    }

    #[test]
    fn committing_default_state_drops_the_entry() {
        let registry = VisitRegistry::new();
        let id = Uuid::new_v4();
        registry.commit(id, SessionState { current_report_text: Some("r".into()), ..Default::default() });
        registry.commit(id, SessionState::default());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn forget_resets_to_default() {
        let registry = VisitRegistry::new();
        let id = Uuid::new_v4();
        registry.commit(id, SessionState { current_report_text: Some("r".into()), ..Default::default() });
        registry.forget(id);
        assert_eq!(registry.checkout(id), SessionState::default());
    }
}
