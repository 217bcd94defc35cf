use crate::{
    build_chunks, extract_page_texts, DocChunk, DocumentFingerprint, IngestError, IngestionOptions,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Everything extracted from one PDF, ready to embed and index.
pub struct PdfIngestion {
    pub fingerprint: DocumentFingerprint,
    pub chunks: Vec<DocChunk>,
    pub page_count: usize,
}

/// Extract and chunk a single PDF. Chunk indices continue from
/// `start_index` so a session's chunks stay globally ordered; the next
/// free index is returned alongside the ingestion.
pub fn chunk_pdf_file(
    path: &Path,
    options: &IngestionOptions,
    start_index: u64,
) -> Result<(PdfIngestion, u64), IngestError> {
    let fingerprint = build_document_fingerprint(path)?;
    let pages = extract_page_texts(path)?;
    let page_count = pages.len();

    let mut chunks = Vec::new();
    let mut cursor = start_index;

    for page in pages {
        let (page_chunks, next_cursor) =
            build_chunks(&fingerprint, page.number, &page.text, options, cursor)?;
        cursor = next_cursor;
        chunks.extend(page_chunks);
    }

    Ok((
        PdfIngestion {
            fingerprint,
            chunks,
            page_count,
        },
        cursor,
    ))
}

pub struct SkippedPdf {
    pub path: PathBuf,
    pub reason: String,
}

pub struct FolderIngestion {
    pub documents: Vec<PdfIngestion>,
    pub skipped_files: Vec<SkippedPdf>,
}

/// Chunk every PDF under `folder`, skipping unreadable files instead of
/// failing the batch. A folder with no PDFs at all is an error.
pub fn chunk_folder_best_effort(
    folder: &Path,
    options: &IngestionOptions,
    start_index: u64,
) -> Result<(FolderIngestion, u64), IngestError> {
    let files = discover_pdf_files(folder);

    if files.is_empty() {
        return Err(IngestError::InvalidArgument(format!(
            "no pdf files found in {}",
            folder.display()
        )));
    }

    let mut documents = Vec::new();
    let mut skipped_files = Vec::new();
    let mut cursor = start_index;

    for path in files {
        match chunk_pdf_file(&path, options, cursor) {
            Ok((ingestion, next_cursor)) => {
                cursor = next_cursor;
                documents.push(ingestion);
            }
            Err(error) => skipped_files.push(SkippedPdf {
                path,
                reason: error.to_string(),
            }),
        }
    }

    Ok((
        FolderIngestion {
            documents,
            skipped_files,
        },
        cursor,
    ))
}

fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let checksum = digest_file(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: name.to_string(),
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
    })
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}
