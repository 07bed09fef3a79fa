//! View routing: which single screen a render pass shows.

use serde::Serialize;

use crate::model::Message;
use crate::state::SessionState;

/// The four screens, chosen purely from session state and stored history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Login page + footer only.
    Unauthenticated,
    /// Welcome screen with the "create session" action.
    NoSession,
    /// Active session, nothing stored yet: analysis form.
    SessionNoMessages,
    /// Active session with history: history, chat input, collapsed form.
    SessionWithMessages,
}

impl ViewState {
    /// `history` is the full stored list for the current session, system
    /// messages included. It is ignored unless a session is active.
    pub fn resolve(state: &SessionState, history: &[Message]) -> Self {
        if !state.is_authenticated() {
            ViewState::Unauthenticated
        } else if state.current_session.is_none() {
            ViewState::NoSession
        } else if history.is_empty() {
            ViewState::SessionNoMessages
        } else {
            ViewState::SessionWithMessages
        }
    }

    /// Greeting and sidebar are shown on every authenticated screen.
    pub fn shows_chrome(self) -> bool {
        self != ViewState::Unauthenticated
    }

    pub fn shows_chat_input(self) -> bool {
        self == ViewState::SessionWithMessages
    }

    /// Whether the analysis form is present, and if so whether collapsed.
    pub fn analysis_form(self) -> Option<FormSlot> {
        match self {
            ViewState::SessionNoMessages => Some(FormSlot::Primary),
            ViewState::SessionWithMessages => Some(FormSlot::Collapsed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSlot {
    Primary,
    Collapsed,
}

/// Messages the user may see: everything except the system side channel,
/// in stored order.
pub fn visible_messages(messages: &[Message]) -> impl Iterator<Item = &Message> {
    messages.iter().filter(|m| !m.is_system())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{AnalysisSession, Role};
    use crate::testing::sample_user;

    fn session() -> AnalysisSession {
        AnalysisSession { id: "s1".into(), title: "Sales".into(), created_at: chrono::Utc::now() }
    }

    #[test]
    fn unauthenticated_wins_over_everything() {
        let state = SessionState { current_session: Some(session()), ..Default::default() };
        let view = ViewState::resolve(&state, &[Message::user("hi")]);
        assert_eq!(view, ViewState::Unauthenticated);
        assert!(!view.shows_chrome());
        assert_eq!(view.analysis_form(), None);
    }

    #[test]
    fn authenticated_without_session_is_welcome() {
        let state = SessionState { user: Some(sample_user()), ..Default::default() };
        let view = ViewState::resolve(&state, &[Message::user("ignored")]);
        assert_eq!(view, ViewState::NoSession);
        assert!(view.shows_chrome());
        assert!(!view.shows_chat_input());
    }

    #[test]
    fn empty_history_shows_primary_form() {
        let state = SessionState {
            user: Some(sample_user()),
            current_session: Some(session()),
            ..Default::default()
        };
        let view = ViewState::resolve(&state, &[]);
        assert_eq!(view, ViewState::SessionNoMessages);
        assert_eq!(view.analysis_form(), Some(FormSlot::Primary));
    }

    #[test]
    fn system_only_history_still_counts_as_messages() {
        let state = SessionState {
            user: Some(sample_user()),
            current_session: Some(session()),
            ..Default::default()
        };
        let view = ViewState::resolve(&state, &[Message::system("meta")]);
        assert_eq!(view, ViewState::SessionWithMessages);
        assert_eq!(view.analysis_form(), Some(FormSlot::Collapsed));
        assert!(view.shows_chat_input());
    }

    #[test]
    fn visible_messages_drop_system_and_keep_order() {
        let messages = vec![
            Message::system("report"),
            Message::user("q1"),
            Message::assistant("a1"),
            Message::system("report 2"),
            Message::user("q2"),
            Message::assistant("a2"),
        ];
        let visible: Vec<_> = visible_messages(&messages).map(|m| (m.role, m.content.as_str())).collect();
        assert_eq!(
            visible,
            vec![
                (Role::User, "q1"),
                (Role::Assistant, "a1"),
                (Role::User, "q2"),
                (Role::Assistant, "a2"),
            ]
        );
    }
}
