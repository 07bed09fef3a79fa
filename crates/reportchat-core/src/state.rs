//! Typed per-visit session state.
//!
//! A [`SessionState`] is checked out by the request handler, mutated during
//! one render pass and committed back when the pass ends. Nothing else holds
//! a reference to it in between.

use serde::{Deserialize, Serialize};

use crate::model::{AnalysisSession, User};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Set once the visitor has logged in.
    pub user: Option<User>,
    /// The analysis session currently shown in the main area.
    pub current_session: Option<AnalysisSession>,
    /// Report text for `current_session`, cached after analysis or after
    /// recovery from a stored system message.
    pub current_report_text: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Cached report text, treating an empty string as "not cached".
    pub fn cached_report_text(&self) -> Option<&str> {
        self.current_report_text.as_deref().filter(|t| !t.is_empty())
    }

    /// Switch the main area to `session` and drop the cache that belonged to
    /// the previous one.
    pub fn activate(&mut self, session: AnalysisSession) {
        self.current_session = Some(session);
        self.current_report_text = None;
    }

    pub fn deactivate(&mut self) {
        self.current_session = None;
        self.current_report_text = None;
    }
}
