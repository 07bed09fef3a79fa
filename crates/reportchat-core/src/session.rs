//! Session-state lifecycle and analysis-session switching.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::model::AnalysisSession;
use crate::service::SessionService;
use crate::state::SessionState;

/// Wraps a [`SessionService`] with the state transitions the pages need.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<dyn SessionService>,
}

impl SessionManager {
    pub fn new(sessions: Arc<dyn SessionService>) -> Self {
        Self { sessions }
    }

    /// Install default state for a new visit. Existing state is left alone,
    /// so calling this on every request is safe.
    pub fn init_session(slot: &mut Option<SessionState>) -> &mut SessionState {
        slot.get_or_insert_with(SessionState::default)
    }

    pub fn is_authenticated(state: &SessionState) -> bool {
        state.is_authenticated()
    }

    /// Create a new analysis session for the logged-in user and make it
    /// current. On failure `state` is not modified.
    pub async fn create_chat_session(&self, state: &mut SessionState) -> Result<AnalysisSession> {
        let user = state.user.as_ref().ok_or(CoreError::Unauthorized)?;
        match self.sessions.create_chat_session(user).await {
            Ok(session) => {
                info!(session_id = %session.id, user_id = %user.id, "analysis session created");
                state.activate(session.clone());
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, user_id = %user.id, "failed to create analysis session");
                Err(e)
            }
        }
    }

    /// Look up a session owned by the logged-in user.
    pub async fn find_session(&self, state: &SessionState, id: &str) -> Result<Option<AnalysisSession>> {
        let user = state.user.as_ref().ok_or(CoreError::Unauthorized)?;
        self.sessions.get_chat_session(user, id).await
    }

    /// Make an existing session of the logged-in user current. Re-selecting
    /// the current session keeps its cached report text.
    pub async fn select_session(&self, state: &mut SessionState, id: &str) -> Result<AnalysisSession> {
        if !state.is_authenticated() {
            return Err(CoreError::Unauthorized);
        }
        if let Some(current) = state.current_session.as_ref().filter(|s| s.id == id) {
            return Ok(current.clone());
        }
        let session = self
            .find_session(state, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("session {id}")))?;
        state.activate(session.clone());
        Ok(session)
    }

    pub fn close_session(state: &mut SessionState) {
        state.deactivate();
    }

    /// Sessions for the sidebar; empty when nobody is logged in.
    pub async fn list_sessions(&self, state: &SessionState) -> Result<Vec<AnalysisSession>> {
        match &state.user {
            Some(user) => self.sessions.list_chat_sessions(user).await,
            None => Ok(Vec::new()),
        }
    }

    /// Rename the current session and keep the cached title in sync.
    pub async fn rename_current(&self, state: &mut SessionState, title: &str) -> Result<()> {
        let Some(session) = state.current_session.as_mut() else {
            return Err(CoreError::Invalid("no active session".into()));
        };
        self.sessions.rename_chat_session(&session.id, title).await?;
        session.title = title.to_owned();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{FakeSessions, sample_user};

    fn logged_in() -> SessionState {
        SessionState { user: Some(sample_user()), ..Default::default() }
    }

    #[test]
    fn init_session_is_idempotent() {
        let mut slot = None;
        SessionManager::init_session(&mut slot).current_report_text = Some("kept".into());
        SessionManager::init_session(&mut slot);
        assert_eq!(slot.unwrap().current_report_text.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn create_success_activates_and_clears_cache() {
        let manager = SessionManager::new(Arc::new(FakeSessions::default()));
        let mut state = logged_in();
        state.current_report_text = Some("old report".into());

        let session = manager.create_chat_session(&mut state).await.unwrap();

        assert_eq!(state.current_session.as_ref(), Some(&session));
        assert_eq!(state.current_report_text, None);
    }

    #[tokio::test]
    async fn create_failure_leaves_state_untouched() {
        let manager = SessionManager::new(Arc::new(FakeSessions::failing()));
        let mut state = logged_in();
        let before = state.clone();

        let result = manager.create_chat_session(&mut state).await;

        assert!(matches!(result, Err(CoreError::Storage(_))));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn create_requires_login() {
        let manager = SessionManager::new(Arc::new(FakeSessions::default()));
        let mut state = SessionState::default();
        let result = manager.create_chat_session(&mut state).await;
        assert!(matches!(result, Err(CoreError::Unauthorized)));
    }

    #[tokio::test]
    async fn select_unknown_session_is_not_found() {
        let manager = SessionManager::new(Arc::new(FakeSessions::default()));
        let mut state = logged_in();
        let result = manager.select_session(&mut state, "missing").await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert!(state.current_session.is_none());
    }

    #[tokio::test]
    async fn select_switches_session_and_drops_cache() {
        let fake = Arc::new(FakeSessions::default());
        let manager = SessionManager::new(fake.clone());
        let mut state = logged_in();
        let first = manager.create_chat_session(&mut state).await.unwrap();
        let second = manager.create_chat_session(&mut state).await.unwrap();
        state.current_report_text = Some("second's report".into());

        manager.select_session(&mut state, &first.id).await.unwrap();

        assert_eq!(state.current_session.as_ref().map(|s| s.id.as_str()), Some(first.id.as_str()));
        assert_ne!(first.id, second.id);
        assert_eq!(state.current_report_text, None);
    }

    #[tokio::test]
    async fn reselecting_current_session_keeps_cache() {
        let manager = SessionManager::new(Arc::new(FakeSessions::default()));
        let mut state = logged_in();
        let session = manager.create_chat_session(&mut state).await.unwrap();
        state.current_report_text = Some("report".into());

        manager.select_session(&mut state, &session.id).await.unwrap();

        assert_eq!(state.cached_report_text(), Some("report"));
    }

    #[tokio::test]
    async fn rename_updates_current_title() {
        let manager = SessionManager::new(Arc::new(FakeSessions::default()));
        let mut state = logged_in();
        manager.create_chat_session(&mut state).await.unwrap();

        manager.rename_current(&mut state, "Q3 revenue").await.unwrap();

        assert_eq!(state.current_session.unwrap().title, "Q3 revenue");
    }
}
