use crate::actions::{parse_directive, ModelDirective};
use crate::error::AgentError;
use crate::models::ChatMessage;
use crate::tools::{SharedWorkspace, ToolRegistry, CONTEXT_SEPARATOR};
use crate::traits::ChatModel;
use crate::workspace::DEFAULT_TOP_K;
use std::sync::PoisonError;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. You can use two tools: \
    ingest_document (to load a PDF) and query_document (to answer questions about previously \
    ingested PDFs). When needed, think step by step. If you need to call a tool, respond with:\n\
    Action: <tool name>\nAction Input: <input for tool>\n\
    Otherwise, just answer the user directly. After you receive an Observation you must produce \
    a Final Answer.";

/// Returned by the grounded path when nothing has been ingested; no model
/// call is spent on a question that cannot be answered.
pub const INGEST_FIRST_MESSAGE: &str =
    "No document has been ingested yet. Please ingest a document before asking questions about it.";

/// Drives one user turn against the model with at most two round-trips:
/// the first completion either answers directly or names a tool, and a
/// recognized tool call feeds its observation back for a second, final
/// completion. Turns carry no state of their own; callers wanting
/// continuity re-supply the running history each turn.
pub struct AgentOrchestrator<M: ChatModel> {
    model: M,
    tools: ToolRegistry,
    workspace: SharedWorkspace,
    system_prompt: String,
}

impl<M: ChatModel + Send + Sync> AgentOrchestrator<M> {
    pub fn new(model: M, workspace: SharedWorkspace) -> Self {
        let tools = ToolRegistry::document_tools(workspace.clone());
        Self::with_tools(model, workspace, tools)
    }

    /// Same orchestrator with a caller-supplied registry.
    pub fn with_tools(model: M, workspace: SharedWorkspace, tools: ToolRegistry) -> Self {
        Self {
            model,
            tools,
            workspace,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// One tool-protocol turn. The answer is the first completion when no
    /// tool is requested; an unknown tool name is answered without being
    /// invoked; a known tool's observation (success or failure text) is
    /// handed back to the model for the final answer.
    pub async fn run_turn(
        &self,
        history: &[ChatMessage],
        user_input: &str,
    ) -> Result<String, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 4);
        messages.push(ChatMessage::system(&self.system_prompt));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(user_input));

        let content = self.model.complete(&messages).await?;

        match parse_directive(&content) {
            ModelDirective::Direct(answer) => Ok(answer),
            ModelDirective::ToolCall { name, argument } => {
                let Some(tool) = self.tools.get(&name) else {
                    return Ok(format!(
                        "Unknown tool '{name}'. Available tools: {}",
                        self.tools.names().join(", ")
                    ));
                };

                let observation = match tool.invoke(&argument).await {
                    Ok(result) => result,
                    Err(error) => format!("Tool '{name}' failed: {error}"),
                };

                messages.push(ChatMessage::assistant(&content));
                messages.push(ChatMessage::user(format!(
                    "Observation: {observation}\nPlease provide Final Answer."
                )));

                self.model.complete(&messages).await
            }
        }
    }

    /// Retrieval-augmented turn: no tool protocol, the index is always
    /// consulted and the hits are inlined ahead of the question in a
    /// single completion. An empty index short-circuits without any model
    /// call.
    pub async fn answer_grounded(
        &self,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, AgentError> {
        let context = {
            let workspace = self
                .workspace
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if workspace.is_empty() {
                return Ok(INGEST_FIRST_MESSAGE.to_string());
            }

            workspace
                .retrieve(question, DEFAULT_TOP_K)
                .iter()
                .map(|hit| hit.chunk.text.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR)
        };

        let prompt = format!(
            "Use the following excerpts from the ingested documents to answer the question.\n\n\
             {context}\n\nQuestion: {question}"
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(&self.system_prompt));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(prompt));

        self.model.complete(&messages).await
    }
}
