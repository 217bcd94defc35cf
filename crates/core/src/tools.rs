use crate::error::ToolError;
use crate::traits::AgentTool;
use crate::workspace::{DocumentWorkspace, IngestOutcome, DEFAULT_TOP_K};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const INGEST_TOOL_NAME: &str = "ingest_document";
pub const QUERY_TOOL_NAME: &str = "query_document";

pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
pub const NO_DOCUMENTS_MESSAGE: &str =
    "No document has been ingested yet. Please use ingest_document first.";
pub const NO_RESULTS_MESSAGE: &str = "No relevant results found for your query.";

pub type SharedWorkspace = Arc<Mutex<DocumentWorkspace>>;

fn lock_workspace(workspace: &SharedWorkspace) -> MutexGuard<'_, DocumentWorkspace> {
    // Turns run one at a time, so a poisoned lock cannot hold a
    // half-applied mutation worth refusing.
    workspace.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Named tools the orchestrator may dispatch to. Lookup is by exact name;
/// a miss is answered, never invoked.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard document toolset over one shared workspace.
    pub fn document_tools(workspace: SharedWorkspace) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(IngestDocumentTool {
            workspace: workspace.clone(),
        }));
        registry.register(Box::new(QueryDocumentTool { workspace }));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }
}

/// Loads a PDF (or a folder of PDFs), chunks and embeds it, and merges the
/// result into the session index.
pub struct IngestDocumentTool {
    workspace: SharedWorkspace,
}

impl IngestDocumentTool {
    pub fn new(workspace: SharedWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl AgentTool for IngestDocumentTool {
    fn name(&self) -> &str {
        INGEST_TOOL_NAME
    }

    async fn invoke(&self, argument: &str) -> Result<String, ToolError> {
        let path_text = argument.trim();
        if path_text.is_empty() {
            return Err(ToolError::InvalidInput(
                "expected a path to a pdf file or folder".to_string(),
            ));
        }

        let mut workspace = lock_workspace(&self.workspace);
        let outcome = workspace.ingest_path(Path::new(path_text))?;
        Ok(format_ingest_outcome(path_text, &outcome))
    }
}

fn format_ingest_outcome(path: &str, outcome: &IngestOutcome) -> String {
    if outcome.summaries.is_empty() {
        return format!(
            "No documents could be ingested from {path}. Skipped {} unreadable files.",
            outcome.skipped.len()
        );
    }

    let mut message = if outcome.summaries.len() == 1 {
        let summary = &outcome.summaries[0];
        format!(
            "Successfully ingested document: {path}. Created {} chunks from {} pages.",
            summary.chunk_count, summary.page_count
        )
    } else {
        format!(
            "Successfully ingested {} documents from {path}. Created {} chunks from {} pages.",
            outcome.summaries.len(),
            outcome.total_chunks(),
            outcome.total_pages()
        )
    };

    if !outcome.skipped.is_empty() {
        message.push_str(&format!(
            " Skipped {} unreadable files.",
            outcome.skipped.len()
        ));
    }

    message
}

/// Answers a free-text query with the most similar ingested chunks.
pub struct QueryDocumentTool {
    workspace: SharedWorkspace,
}

impl QueryDocumentTool {
    pub fn new(workspace: SharedWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl AgentTool for QueryDocumentTool {
    fn name(&self) -> &str {
        QUERY_TOOL_NAME
    }

    async fn invoke(&self, argument: &str) -> Result<String, ToolError> {
        let workspace = lock_workspace(&self.workspace);

        if workspace.is_empty() {
            return Ok(NO_DOCUMENTS_MESSAGE.to_string());
        }

        let hits = workspace.retrieve(argument, DEFAULT_TOP_K);
        if hits.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let combined = hits
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        Ok(format!("Found {} relevant chunks:\n\n{combined}", hits.len()))
    }
}
