/// Output width of the default embedder, chosen to match the small
/// sentence-transformer models this stands in for.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// Maps text to a fixed-length vector. Implementations must be
/// deterministic: the same text always embeds to the same vector.
pub trait Embedder {
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;

    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Local embedding provider: hashed character trigrams bucketed into a
/// fixed-width histogram, L2-normalized. No model download, no network.
#[derive(Debug, Clone, Copy)]
pub struct HashedNgramEmbedder {
    pub dimensions: usize,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl Embedder for HashedNgramEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions.max(1)];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return vector;
        }

        for window in chars.windows(3) {
            let token = window.iter().collect::<String>();
            // FNV-1a over the trigram bytes picks the histogram bucket.
            let mut hash = 1469598103934665603u64;
            for byte in token.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(1099511628211);
            }
            let bucket = (hash % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

#[cfg(test)]
mod tests {
    use super::{Embedder, HashedNgramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};

    #[test]
    fn embedder_is_deterministic() {
        let embedder = HashedNgramEmbedder::default();
        let first = embedder.embed("What is the refund policy?");
        let second = embedder.embed("What is the refund policy?");
        assert_eq!(first, second);
    }

    #[test]
    fn embedder_outputs_configured_width() {
        let embedder = HashedNgramEmbedder { dimensions: 32 };
        assert_eq!(embedder.embed("abc").len(), 32);
        assert_eq!(
            HashedNgramEmbedder::default().embed("abc").len(),
            DEFAULT_EMBEDDING_DIMENSIONS
        );
    }

    #[test]
    fn batch_embedding_matches_single_calls() {
        let embedder = HashedNgramEmbedder { dimensions: 64 };
        let texts = vec!["first chunk".to_string(), "second chunk".to_string()];

        let batch = embedder.embed_batch(&texts);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("first chunk"));
        assert_eq!(batch[1], embedder.embed("second chunk"));
    }

    #[test]
    fn similar_text_scores_closer_than_unrelated_text() {
        let embedder = HashedNgramEmbedder::default();
        let base = embedder.embed("hydraulic pump maintenance schedule");
        let near = embedder.embed("maintenance schedule for hydraulic pumps");
        let far = embedder.embed("chocolate cake recipe with frosting");

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&base, &near) > dot(&base, &far));
    }
}
