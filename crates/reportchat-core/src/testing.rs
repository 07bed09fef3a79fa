//! In-memory collaborator fakes shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{CoreError, Result};
use crate::model::{AnalysisSession, Message, Role, User};
use crate::service::{ChatResponder, MessageStore, ReportGenerator, SessionService};

pub fn sample_user() -> User {
    User { id: "u1".into(), name: "Ada".into(), email: "ada@example.com".into() }
}

#[derive(Default)]
pub struct FakeSessions {
    fail: bool,
    next: AtomicUsize,
    sessions: Mutex<Vec<AnalysisSession>>,
}

impl FakeSessions {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }
}

#[async_trait]
impl SessionService for FakeSessions {
    async fn create_chat_session(&self, _owner: &User) -> Result<AnalysisSession> {
        if self.fail {
            return Err(CoreError::Storage("disk full".into()));
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        let session = AnalysisSession {
            id: format!("s{n}"),
            title: format!("Analysis {n}"),
            created_at: Utc::now(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn get_chat_session(&self, _owner: &User, id: &str) -> Result<Option<AnalysisSession>> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn list_chat_sessions(&self, _owner: &User) -> Result<Vec<AnalysisSession>> {
        Ok(self.sessions.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn rename_chat_session(&self, id: &str, title: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::NotFound(id.into()))?;
        session.title = title.into();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMessages {
    fail: bool,
    saved: Mutex<Vec<(String, Message)>>,
}

impl FakeMessages {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn saved(&self) -> Vec<(String, Message)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for FakeMessages {
    async fn get_session_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        if self.fail {
            return Err(CoreError::Storage("connection reset".into()));
        }
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .filter(|(sid, _)| sid == session_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn save_chat_message(&self, session_id: &str, content: &str, role: Role) -> Result<()> {
        if self.fail {
            return Err(CoreError::Storage("connection reset".into()));
        }
        self.saved.lock().unwrap().push((session_id.into(), Message::new(role, content)));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ResponderCall {
    pub prompt: String,
    pub context: String,
    pub history_len: usize,
}

pub struct RecordingResponder {
    answer: Option<String>,
    calls: Mutex<Vec<ResponderCall>>,
}

impl RecordingResponder {
    pub fn new(answer: &str) -> Self {
        Self { answer: Some(answer.into()), calls: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { answer: None, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<ResponderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatResponder for RecordingResponder {
    async fn get_chat_response(
        &self,
        prompt: &str,
        context_text: &str,
        messages: &[Message],
    ) -> Result<String> {
        self.calls.lock().unwrap().push(ResponderCall {
            prompt: prompt.into(),
            context: context_text.into(),
            history_len: messages.len(),
        });
        self.answer.clone().ok_or_else(|| CoreError::Ai("upstream 503".into()))
    }
}

pub struct FixedReport(pub String);

#[async_trait]
impl ReportGenerator for FixedReport {
    async fn generate_report(&self, _data: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
