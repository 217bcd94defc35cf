use crate::error::IngestError;
use crate::models::{DocChunk, DocumentFingerprint, IngestionOptions};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
    pub min_chars: usize,
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_chars == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "max_chars must be greater than zero".to_string(),
            ));
        }
        if self.overlap_chars >= self.max_chars {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap_chars {} must be smaller than max_chars {}",
                self.overlap_chars, self.max_chars
            )));
        }
        Ok(())
    }
}

impl From<&IngestionOptions> for ChunkingConfig {
    fn from(value: &IngestionOptions) -> Self {
        Self {
            max_chars: value.chunk_max_chars,
            overlap_chars: value.chunk_overlap_chars,
            min_chars: value.min_chunk_chars,
        }
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Split a page into bounded chunks: paragraphs are packed together up to
/// `max_chars`, and anything still oversized is cut into character windows
/// that overlap by `overlap_chars` so text straddling a cut survives in
/// both neighbors.
pub fn split_with_overlap(page_text: &str, config: ChunkingConfig) -> Vec<String> {
    let paragraphs = page_text
        .split("\n\n")
        .map(normalize_whitespace)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>();

    let mut packed = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        if current.is_empty() {
            current.push_str(&paragraph);
            continue;
        }

        if current.len() + paragraph.len() + 2 <= config.max_chars {
            current.push_str("\n\n");
            current.push_str(&paragraph);
        } else {
            packed.push(current.clone());
            current.clear();
            current.push_str(&paragraph);
        }
    }

    if !current.is_empty() {
        packed.push(current);
    }

    let mut windows = Vec::new();
    for block in packed {
        if block.len() <= config.max_chars {
            windows.push(block);
            continue;
        }

        let chars: Vec<char> = block.chars().collect();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + config.max_chars).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            windows.push(piece);
            if end == chars.len() {
                break;
            }
            start = start.saturating_add(config.max_chars.saturating_sub(config.overlap_chars));
        }
    }

    windows
}

pub fn build_chunks(
    document: &DocumentFingerprint,
    page: u32,
    page_text: &str,
    options: &IngestionOptions,
    global_index: u64,
) -> Result<(Vec<DocChunk>, u64), IngestError> {
    let config = ChunkingConfig::from(options);
    config.validate()?;

    let mut pieces: Vec<String> = split_with_overlap(page_text, config)
        .into_iter()
        .filter(|piece| piece.trim().len() >= config.min_chars)
        .collect();

    // A short page still deserves one chunk rather than silently vanishing.
    if pieces.is_empty() {
        let fallback = normalize_whitespace(page_text);
        if !fallback.is_empty() {
            pieces.push(fallback);
        }
    }

    let mut chunks = Vec::with_capacity(pieces.len());
    let mut cursor = global_index;

    for piece in pieces {
        let chunk_id = make_chunk_id(&document.document_id, page, cursor, &piece);

        chunks.push(DocChunk {
            chunk_id,
            document_id: document.document_id.clone(),
            source_path: document.source_path.clone(),
            title: document.document_title.clone(),
            page,
            chunk_index: cursor,
            text: piece,
        });

        cursor = cursor.saturating_add(1);
    }

    Ok((chunks, cursor))
}

fn make_chunk_id(document_id: &str, page: u32, index: u64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(page.to_le_bytes());
    hasher.update(index.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fingerprint() -> DocumentFingerprint {
        DocumentFingerprint {
            document_id: "doc-1".to_string(),
            document_title: "manual.pdf".to_string(),
            source_path: "/tmp/manual.pdf".to_string(),
            checksum: "checksum".to_string(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn whitespace_is_normalized() {
        let input = "A  \t  lot\nof   spacing";
        assert_eq!(normalize_whitespace(input), "A lot of spacing");
    }

    #[test]
    fn oversized_text_is_windowed_with_overlap() {
        let config = ChunkingConfig {
            max_chars: 10,
            overlap_chars: 4,
            min_chars: 1,
        };

        let text = "abcdefghijklmnopqrstuvwxyz";
        let windows = split_with_overlap(text, config);

        assert!(windows.len() > 1);
        assert!(windows.iter().all(|window| window.len() <= 10));
        // Each window after the first starts inside the previous one.
        assert!(windows[1].starts_with(&windows[0][6..]));
    }

    #[test]
    fn paragraphs_pack_until_the_limit() {
        let config = ChunkingConfig {
            max_chars: 40,
            overlap_chars: 8,
            min_chars: 1,
        };

        let text = "First paragraph here.\n\nSecond one.\n\nThird paragraph is separate.";
        let windows = split_with_overlap(text, config);

        assert_eq!(windows.len(), 2);
        assert!(windows[0].contains("First paragraph here."));
        assert!(windows[0].contains("Second one."));
        assert_eq!(windows[1], "Third paragraph is separate.");
    }

    #[test]
    fn overlap_must_be_smaller_than_max() {
        let options = IngestionOptions {
            chunk_max_chars: 100,
            chunk_overlap_chars: 100,
            min_chunk_chars: 10,
        };

        let result = build_chunks(&fingerprint(), 1, "some text", &options, 0);
        assert!(matches!(result, Err(IngestError::InvalidChunkConfig(_))));
    }

    #[test]
    fn short_pages_still_produce_one_chunk() {
        let options = IngestionOptions {
            chunk_max_chars: 1_000,
            chunk_overlap_chars: 200,
            min_chunk_chars: 40,
        };

        let (chunks, next) = build_chunks(&fingerprint(), 3, "tiny page", &options, 7)
            .expect("chunking should succeed");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "tiny page");
        assert_eq!(chunks[0].page, 3);
        assert_eq!(chunks[0].chunk_index, 7);
        assert_eq!(next, 8);
    }

    #[test]
    fn chunk_ids_depend_on_position_and_text() {
        let options = IngestionOptions::default();
        let (first, _) = build_chunks(&fingerprint(), 1, "identical text", &options, 0).unwrap();
        let (second, _) = build_chunks(&fingerprint(), 2, "identical text", &options, 0).unwrap();

        assert_ne!(first[0].chunk_id, second[0].chunk_id);
    }
}
