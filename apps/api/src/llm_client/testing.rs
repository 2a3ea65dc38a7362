//! Scripted `ChatModel` for unit and handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatModel, ChatRequest, LlmError};

/// Owned copy of a request the scripted model received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

enum Script {
    Reply(String),
    MissingKey,
    ApiError(u16, String),
}

#[derive(Clone)]
pub struct ScriptedModel {
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedModel {
    fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::new(Script::Reply(reply.to_string()))
    }

    pub fn failing_missing_key() -> Self {
        Self::new(Script::MissingKey)
    }

    pub fn failing_with_status(status: u16, message: &str) -> Self {
        Self::new(Script::ApiError(status, message.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        });

        match self.script.as_ref() {
            Script::Reply(text) => Ok(text.clone()),
            Script::MissingKey => Err(LlmError::MissingApiKey),
            Script::ApiError(status, message) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self.script.as_ref(), Script::MissingKey)
    }
}
