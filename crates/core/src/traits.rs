use crate::error::{AgentError, ToolError};
use crate::models::ChatMessage;
use async_trait::async_trait;

/// Stateless request/response completion over a role-tagged message list.
#[async_trait]
pub trait ChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError>;
}

/// A named capability the model may request by emitting an action block.
/// Invocation takes a single string argument and produces the observation
/// text handed back to the model.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, argument: &str) -> Result<String, ToolError>;
}
