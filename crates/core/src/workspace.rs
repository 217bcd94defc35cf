use crate::embeddings::{Embedder, HashedNgramEmbedder};
use crate::error::IngestError;
use crate::index::VectorIndex;
use crate::ingest::{chunk_folder_best_effort, chunk_pdf_file, PdfIngestion, SkippedPdf};
use crate::models::{IngestionOptions, IngestionSummary, RetrievedChunk};
use std::path::Path;
use uuid::Uuid;

pub const DEFAULT_TOP_K: usize = 3;

/// What one ingestion request produced: per-document summaries plus the
/// files a folder walk had to skip.
pub struct IngestOutcome {
    pub summaries: Vec<IngestionSummary>,
    pub skipped: Vec<SkippedPdf>,
}

impl IngestOutcome {
    pub fn total_chunks(&self) -> usize {
        self.summaries.iter().map(|summary| summary.chunk_count).sum()
    }

    pub fn total_pages(&self) -> usize {
        self.summaries.iter().map(|summary| summary.page_count).sum()
    }
}

/// Session-scoped document state: one embedding provider and one vector
/// index, created together so every entry matches the provider's width.
/// Owned explicitly and injected into whoever needs it; independent
/// sessions never share state.
pub struct DocumentWorkspace {
    session_id: Uuid,
    embedder: HashedNgramEmbedder,
    index: VectorIndex,
    options: IngestionOptions,
    next_chunk_index: u64,
}

impl Default for DocumentWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWorkspace {
    pub fn new() -> Self {
        Self::with_options(IngestionOptions::default())
    }

    pub fn with_options(options: IngestionOptions) -> Self {
        let embedder = HashedNgramEmbedder::default();
        Self {
            session_id: Uuid::new_v4(),
            index: VectorIndex::new(embedder.dimensions()),
            embedder,
            options,
            next_chunk_index: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ingest one PDF: extract, chunk, embed, then merge into the index.
    /// The index is only touched once the whole document has been
    /// processed, so a failure leaves previous ingestions intact.
    pub fn ingest_file(&mut self, path: &Path) -> Result<IngestionSummary, IngestError> {
        let (ingestion, next_index) =
            chunk_pdf_file(path, &self.options, self.next_chunk_index)?;
        let summary = self.absorb(ingestion)?;
        self.next_chunk_index = next_index;
        Ok(summary)
    }

    /// Ingest a file, or every PDF under a folder (best effort: unreadable
    /// files are reported as skipped rather than failing the batch).
    pub fn ingest_path(&mut self, path: &Path) -> Result<IngestOutcome, IngestError> {
        if path.is_dir() {
            let (report, next_index) =
                chunk_folder_best_effort(path, &self.options, self.next_chunk_index)?;

            let mut summaries = Vec::with_capacity(report.documents.len());
            for ingestion in report.documents {
                summaries.push(self.absorb(ingestion)?);
            }
            self.next_chunk_index = next_index;

            Ok(IngestOutcome {
                summaries,
                skipped: report.skipped_files,
            })
        } else {
            let summary = self.ingest_file(path)?;
            Ok(IngestOutcome {
                summaries: vec![summary],
                skipped: Vec::new(),
            })
        }
    }

    /// The `top_k` chunks most similar to `query`, best first. Read-only;
    /// an empty index yields an empty result.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        if self.index.is_empty() {
            return Vec::new();
        }

        let query_vector = self.embedder.embed(query);
        self.index.search(&query_vector, top_k)
    }

    fn absorb(&mut self, ingestion: PdfIngestion) -> Result<IngestionSummary, IngestError> {
        let texts: Vec<String> = ingestion
            .chunks
            .iter()
            .map(|chunk| chunk.text.clone())
            .collect();
        let embeddings = self.embedder.embed_batch(&texts);

        let summary = IngestionSummary {
            source_path: ingestion.fingerprint.source_path.clone(),
            page_count: ingestion.page_count,
            chunk_count: ingestion.chunks.len(),
        };

        self.index.add(ingestion.chunks, embeddings)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentWorkspace, DEFAULT_TOP_K};
    use crate::test_support::write_sample_pdf;
    use tempfile::tempdir;

    #[test]
    fn retrieval_on_empty_workspace_is_empty() {
        let workspace = DocumentWorkspace::new();
        assert!(workspace.is_empty());
        assert!(workspace.retrieve("anything", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn ingesting_two_documents_keeps_both_retrievable() {
        let dir = tempdir().expect("tempdir");
        let refund_path = dir.path().join("refunds.pdf");
        let warranty_path = dir.path().join("warranty.pdf");
        write_sample_pdf(
            &refund_path,
            &["Refund policy: purchases may be refunded within thirty days of delivery."],
        );
        write_sample_pdf(
            &warranty_path,
            &["Warranty coverage: hardware defects are repaired free for two years."],
        );

        let mut workspace = DocumentWorkspace::new();
        let first = workspace.ingest_file(&refund_path).expect("ingest refunds");
        let second = workspace
            .ingest_file(&warranty_path)
            .expect("ingest warranty");

        assert!(first.chunk_count > 0);
        assert!(second.chunk_count > 0);
        assert_eq!(workspace.chunk_count(), first.chunk_count + second.chunk_count);

        let refund_hits = workspace.retrieve("refund within thirty days", DEFAULT_TOP_K);
        assert!(refund_hits
            .iter()
            .any(|hit| hit.chunk.text.to_lowercase().contains("refund")));

        let warranty_hits = workspace.retrieve("warranty coverage for hardware", DEFAULT_TOP_K);
        assert!(warranty_hits
            .iter()
            .any(|hit| hit.chunk.text.to_lowercase().contains("warranty")));
    }

    #[test]
    fn failed_ingestion_leaves_the_index_untouched() {
        let dir = tempdir().expect("tempdir");
        let good = dir.path().join("good.pdf");
        let broken = dir.path().join("broken.pdf");
        write_sample_pdf(&good, &["Shipping takes three to five business days."]);
        std::fs::write(&broken, b"%PDF-1.4\n%broken").expect("write");

        let mut workspace = DocumentWorkspace::new();
        workspace.ingest_file(&good).expect("ingest good");
        let before = workspace.chunk_count();

        assert!(workspace.ingest_file(&broken).is_err());
        assert_eq!(workspace.chunk_count(), before);
    }

    #[test]
    fn folder_ingestion_reports_skips() {
        let dir = tempdir().expect("tempdir");
        write_sample_pdf(
            &dir.path().join("ok.pdf"),
            &["Support is available on weekdays between nine and five."],
        );
        std::fs::write(dir.path().join("bad.pdf"), b"%PDF-1.4\n%broken").expect("write");

        let mut workspace = DocumentWorkspace::new();
        let outcome = workspace.ingest_path(dir.path()).expect("folder ingest");

        assert_eq!(outcome.summaries.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.total_chunks() > 0);
        assert!(!workspace.is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let first = DocumentWorkspace::new();
        let second = DocumentWorkspace::new();
        assert_ne!(first.session_id(), second.session_id());
    }
}
