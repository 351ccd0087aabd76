use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use shared::llm::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
    LlmTokenUsage,
};

pub enum MockReply {
    Output(Value),
    Timeout,
    ProviderFailure(&'static str),
    InvalidPayload(&'static str),
}

#[derive(Debug, Clone)]
pub struct CapturedLlmCall {
    pub capability: &'static str,
    pub prompt: String,
    pub requester_id: Option<String>,
}

/// Replies from a fixed script in call order; once the script runs out every
/// call fails with a provider error.
pub struct MockLlmGateway {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<CapturedLlmCall>>,
}

impl MockLlmGateway {
    pub fn scripted(replies: Vec<MockReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from(replies)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    pub fn calls(&self) -> Vec<CapturedLlmCall> {
        self.calls.lock().expect("call log lock").clone()
    }
}

impl LlmGateway for MockLlmGateway {
    fn generate<'a>(&'a self, request: LlmGatewayRequest) -> LlmGatewayFuture<'a> {
        self.calls
            .lock()
            .expect("call log lock")
            .push(CapturedLlmCall {
                capability: request.capability.as_str(),
                prompt: request.prompt.clone(),
                requester_id: request.requester_id.clone(),
            });
        let reply = self.replies.lock().expect("reply script lock").pop_front();

        Box::pin(async move {
            match reply {
                Some(MockReply::Output(output)) => Ok(LlmGatewayResponse {
                    model: "google/gemini-2.0-flash-001".to_string(),
                    provider_request_id: Some("gen-mock".to_string()),
                    output,
                    usage: Some(LlmTokenUsage {
                        prompt_tokens: 120,
                        completion_tokens: 40,
                        total_tokens: 160,
                    }),
                }),
                Some(MockReply::Timeout) => Err(LlmGatewayError::Timeout),
                Some(MockReply::ProviderFailure(code)) => {
                    Err(LlmGatewayError::ProviderFailure(code.to_string()))
                }
                Some(MockReply::InvalidPayload(message)) => {
                    Err(LlmGatewayError::InvalidProviderPayload(message.to_string()))
                }
                None => Err(LlmGatewayError::ProviderFailure(
                    "mock script exhausted".to_string(),
                )),
            }
        })
    }
}
