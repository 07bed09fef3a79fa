//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use reportchat_core::service::{ChatResponder, ReportGenerator};
use reportchat_core::view::visible_messages;
use reportchat_core::{Message, Role};
use tracing::{debug, info};

use super::AiError;
use crate::config::AiConfig;
use crate::schemas::openai::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

const ASSISTANT_PROMPT: &str = "You are an analysis assistant. Answer follow-up questions about \
the report the user generated. Be concise and cite figures from the report when they are relevant. \
If the report does not contain the answer, say so.";

const REPORT_PROMPT: &str = "You are a data analyst. Write a clear, structured report about the \
data the user provides: a short summary, the key findings, notable outliers or risks, and \
recommended next steps. Use Markdown headings and bullet points.";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, messages: Vec<WireMessage>) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(0.3),
        };
        debug!(model = %self.model, messages = request.messages.len(), "sending chat completion");

        let response: ChatCompletionResponse = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let choice = response.choices.into_iter().next().ok_or(AiError::EmptyCompletion)?;
        info!(
            model = response.model.as_deref().unwrap_or(&self.model),
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            output_len = choice.message.content.len(),
            "chat completion done"
        );
        if choice.message.content.trim().is_empty() {
            return Err(AiError::EmptyCompletion);
        }
        Ok(choice.message.content)
    }
}

/// Conversation sent upstream for a follow-up question: instructions with
/// the report attached, the visible history, then the new question.
pub fn build_chat_messages(prompt: &str, context_text: &str, history: &[Message]) -> Vec<WireMessage> {
    let system = if context_text.is_empty() {
        ASSISTANT_PROMPT.to_owned()
    } else {
        format!("{ASSISTANT_PROMPT}\n\nReport:\n{context_text}")
    };
    let mut messages = vec![WireMessage::new("system", system)];
    messages.extend(
        visible_messages(history).map(|m| WireMessage::new(wire_role(m.role), m.content.clone())),
    );
    messages.push(WireMessage::new("user", prompt));
    messages
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    }
}

#[async_trait]
impl ChatResponder for OpenAiClient {
    async fn get_chat_response(
        &self,
        prompt: &str,
        context_text: &str,
        messages: &[Message],
    ) -> reportchat_core::Result<String> {
        Ok(self.complete(build_chat_messages(prompt, context_text, messages)).await?)
    }
}

#[async_trait]
impl ReportGenerator for OpenAiClient {
    async fn generate_report(&self, data: &str) -> reportchat_core::Result<String> {
        let messages = vec![WireMessage::new("system", REPORT_PROMPT), WireMessage::new("user", data)];
        Ok(self.complete(messages).await?)
    }
}
