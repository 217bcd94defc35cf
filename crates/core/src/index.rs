use crate::error::IngestError;
use crate::models::{DocChunk, RetrievedChunk};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: DocChunk,
    pub embedding: Vec<f32>,
}

/// In-memory vector index over (chunk, embedding) pairs.
///
/// The dimension is fixed at construction and every entry must match it,
/// which keeps a single embedding provider per index by construction.
/// Entries are additive-only: ingestion appends or merges, nothing is ever
/// deleted or rewritten, and search is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Append chunks with their embeddings. Validation happens before any
    /// mutation, so a rejected batch leaves the index exactly as it was.
    pub fn add(
        &mut self,
        chunks: Vec<DocChunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<(), IngestError> {
        if chunks.len() != embeddings.len() {
            return Err(IngestError::CountMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        for embedding in &embeddings {
            if embedding.len() != self.dimensions {
                return Err(IngestError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: embedding.len(),
                });
            }
        }

        self.entries.extend(
            chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| IndexEntry { chunk, embedding }),
        );

        Ok(())
    }

    /// Fold another index of the same dimension into this one.
    pub fn merge(&mut self, other: VectorIndex) -> Result<(), IngestError> {
        if other.dimensions != self.dimensions {
            return Err(IngestError::DimensionMismatch {
                expected: self.dimensions,
                actual: other.dimensions,
            });
        }

        self.entries.extend(other.entries);
        Ok(())
    }

    /// The `top_k` nearest entries by descending cosine similarity, or an
    /// empty vector when the index holds nothing.
    pub fn search(&self, query_vector: &[f32], top_k: usize) -> Vec<RetrievedChunk> {
        let mut scored: Vec<RetrievedChunk> = self
            .entries
            .iter()
            .map(|entry| RetrievedChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_vector, &entry.embedding),
            })
            .collect();

        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(top_k);
        scored
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut left_sq = 0.0f32;
    let mut right_sq = 0.0f32;

    for (a, b) in left.iter().zip(right.iter()) {
        dot += a * b;
        left_sq += a * a;
        right_sq += b * b;
    }

    let magnitude = left_sq.sqrt() * right_sq.sqrt();
    if magnitude > 0.0 {
        dot / magnitude
    } else {
        0.0
    }
}
