//! Analysis run: submitted data in, stored report out.

use std::sync::Arc;

use tracing::info;

use crate::error::{CoreError, Result};
use crate::model::Role;
use crate::report::wrap_report_text;
use crate::service::{MessageStore, ReportGenerator};
use crate::state::SessionState;

/// Upper bound on submitted analysis data.
pub const MAX_DATA_BYTES: usize = 64 * 1024;

/// Trim submitted data and enforce the size limit in bytes. Returns the
/// trimmed data.
pub fn check_data(data: &str) -> Result<&str> {
    let data = data.trim();
    if data.is_empty() {
        return Err(CoreError::Invalid("analysis data is empty".into()));
    }
    if data.len() > MAX_DATA_BYTES {
        return Err(CoreError::Invalid(format!(
            "analysis data too large ({} bytes); maximum is {MAX_DATA_BYTES} bytes",
            data.len()
        )));
    }
    Ok(data)
}

#[derive(Clone)]
pub struct AnalysisRun {
    store: Arc<dyn MessageStore>,
    generator: Arc<dyn ReportGenerator>,
}

impl AnalysisRun {
    pub fn new(store: Arc<dyn MessageStore>, generator: Arc<dyn ReportGenerator>) -> Self {
        Self { store, generator }
    }

    /// Generate a report for `data` and attach it to the current session.
    ///
    /// Stores the sentinel-wrapped report as a system message followed by the
    /// plain report as an assistant message, then caches the report text.
    pub async fn run(&self, state: &mut SessionState, data: &str) -> Result<String> {
        let data = check_data(data)?;
        let session_id = state
            .current_session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or_else(|| CoreError::Invalid("no active session".into()))?;

        let report = self.generator.generate_report(data).await?;

        self.store
            .save_chat_message(&session_id, &wrap_report_text(&report), Role::System)
            .await?;
        self.store.save_chat_message(&session_id, &report, Role::Assistant).await?;

        info!(session_id = %session_id, report_len = report.len(), "analysis report stored");
        state.current_report_text = Some(report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{AnalysisSession, Message};
    use crate::report::find_report_text;
    use crate::testing::{FakeMessages, FixedReport, sample_user};

    fn active_state() -> SessionState {
        SessionState {
            user: Some(sample_user()),
            current_session: Some(AnalysisSession {
                id: "s1".into(),
                title: "t".into(),
                created_at: chrono::Utc::now(),
            }),
            current_report_text: None,
        }
    }

    #[tokio::test]
    async fn run_stores_system_then_assistant_and_caches() {
        let store = Arc::new(FakeMessages::default());
        let run = AnalysisRun::new(store.clone(), Arc::new(FixedReport("Revenue up 4%".into())));
        let mut state = active_state();

        let report = run.run(&mut state, "q1,100\nq2,104").await.unwrap();

        assert_eq!(report, "Revenue up 4%");
        assert_eq!(state.current_report_text.as_deref(), Some("Revenue up 4%"));
        let saved: Vec<Message> = store.saved().into_iter().map(|(_, m)| m).collect();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].role, Role::System);
        assert_eq!(saved[1], Message::assistant("Revenue up 4%"));
        assert_eq!(find_report_text(&saved), Some("Revenue up 4%"));
    }

    #[tokio::test]
    async fn rerun_refreshes_cache() {
        let store = Arc::new(FakeMessages::default());
        let run = AnalysisRun::new(store, Arc::new(FixedReport("new".into())));
        let mut state = active_state();
        state.current_report_text = Some("old".into());

        run.run(&mut state, "data").await.unwrap();

        assert_eq!(state.cached_report_text(), Some("new"));
    }

    #[tokio::test]
    async fn empty_data_is_rejected_before_generation() {
        let store = Arc::new(FakeMessages::default());
        let run = AnalysisRun::new(store.clone(), Arc::new(FixedReport("x".into())));
        let mut state = active_state();

        let result = run.run(&mut state, "  \n ").await;

        assert!(matches!(result, Err(CoreError::Invalid(_))));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn oversized_data_is_rejected() {
        let run = AnalysisRun::new(
            Arc::new(FakeMessages::default()),
            Arc::new(FixedReport("x".into())),
        );
        let mut state = active_state();
        let data = "x".repeat(MAX_DATA_BYTES + 1);
        assert!(matches!(run.run(&mut state, &data).await, Err(CoreError::Invalid(_))));
    }

    #[test]
    fn data_limit_counts_bytes_not_chars() {
        // Two bytes per char: under the limit in chars, over it in bytes.
        let data = "é".repeat(MAX_DATA_BYTES / 2 + 1);
        assert!(data.chars().count() < MAX_DATA_BYTES);
        assert!(matches!(check_data(&data), Err(CoreError::Invalid(m)) if m.contains("bytes")));
    }

    #[test]
    fn check_data_trims() {
        assert_eq!(check_data("  a,b\n").unwrap(), "a,b");
    }
}
