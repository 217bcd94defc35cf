pub mod actions;
pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod tools;
pub mod traits;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::{parse_directive, ModelDirective, ACTION_INPUT_MARKER, ACTION_MARKER};
pub use chunking::{build_chunks, normalize_whitespace, split_with_overlap, ChunkingConfig};
pub use embeddings::{Embedder, HashedNgramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{AgentError, IngestError, ToolError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use index::{IndexEntry, VectorIndex};
pub use ingest::{
    chunk_folder_best_effort, chunk_pdf_file, digest_file, discover_pdf_files, FolderIngestion,
    PdfIngestion, SkippedPdf,
};
pub use llm::{GroqClient, LlmConfig, API_KEY_ENV, DEFAULT_CHAT_ENDPOINT, DEFAULT_CHAT_MODEL};
pub use models::{
    ChatMessage, ChatRole, DocChunk, DocumentFingerprint, IngestionOptions, IngestionSummary,
    RetrievedChunk,
};
pub use orchestrator::{AgentOrchestrator, DEFAULT_SYSTEM_PROMPT, INGEST_FIRST_MESSAGE};
pub use tools::{
    IngestDocumentTool, QueryDocumentTool, SharedWorkspace, ToolRegistry, CONTEXT_SEPARATOR,
    INGEST_TOOL_NAME, NO_DOCUMENTS_MESSAGE, NO_RESULTS_MESSAGE, QUERY_TOOL_NAME,
};
pub use traits::{AgentTool, ChatModel};
pub use workspace::{DocumentWorkspace, IngestOutcome, DEFAULT_TOP_K};
