//! Text-completion service contract.
//!
//! The engine side only builds requests and reads back text. Transport,
//! credentials and retries live in whatever implements [`CompletionClient`].

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::result::AiError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered, role-tagged messages plus sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.messages.is_empty() {
            return Err(AiError::InvalidInput("completion request has no messages".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AiError::InvalidInput(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(AiError::InvalidInput("max_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

/// A text-completion service.
pub trait CompletionClient: Send + Sync + 'static {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

/// Replays canned responses in order and records every request (tests/dev).
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl CompletionClient for ScriptedCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        self.requests
            .lock()
            .map_err(|_| AiError::CompletionFailed("request log poisoned".to_string()))?
            .push(request.clone());
        self.responses
            .lock()
            .map_err(|_| AiError::CompletionFailed("response queue poisoned".to_string()))?
            .pop_front()
            .ok_or_else(|| AiError::CompletionFailed("no scripted response left".to_string()))
    }
}
