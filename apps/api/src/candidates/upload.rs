//! Per-file CV ingestion: type check, content-hash dedup, text extraction,
//! attribute extraction, insert.

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::Pipeline;
use crate::documents::{extract_text, is_allowed_file, sha256_hex, DocumentError};
use crate::models::candidate::NewCandidate;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadStatus {
    Success {
        candidate_id: Uuid,
        /// True when extraction fell back to the placeholder record.
        analysis_failed: bool,
    },
    Skipped {
        candidate_id: Uuid,
        message: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub filename: String,
    #[serde(flatten)]
    pub status: UploadStatus,
}

/// Ingests one uploaded file. Never fails the whole request; every problem
/// is reported in the file's status.
pub async fn ingest_file(
    store: &dyn Store,
    pipeline: &Pipeline,
    filename: String,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> UploadResult {
    let status = ingest(store, pipeline, &filename, bytes, max_bytes).await;
    UploadResult { filename, status }
}

async fn ingest(
    store: &dyn Store,
    pipeline: &Pipeline,
    filename: &str,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> UploadStatus {
    if !is_allowed_file(filename) {
        return UploadStatus::Error {
            message: DocumentError::UnsupportedType(filename.to_string()).to_string(),
        };
    }
    if bytes.len() > max_bytes {
        return UploadStatus::Error {
            message: format!("file exceeds the {max_bytes} byte upload limit"),
        };
    }

    let filehash = sha256_hex(&bytes);
    match store.find_candidate_by_hash(&filehash).await {
        Ok(Some(existing)) => {
            info!(filename, candidate_id = %existing.id, "Duplicate CV skipped");
            return UploadStatus::Skipped {
                candidate_id: existing.id,
                message: format!("already uploaded as {}", existing.cv_name),
            };
        }
        Ok(None) => {}
        Err(e) => {
            error!(filename, "Hash lookup failed: {e:?}");
            return UploadStatus::Error {
                message: "could not check for duplicates".to_string(),
            };
        }
    }

    let name = filename.to_string();
    let text = match tokio::task::spawn_blocking(move || extract_text(&name, &bytes)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(filename, "Text extraction failed: {e}");
            return UploadStatus::Error {
                message: e.to_string(),
            };
        }
        Err(e) => {
            error!(filename, "Text extraction task failed: {e}");
            return UploadStatus::Error {
                message: "text extraction failed".to_string(),
            };
        }
    };

    let analysis = pipeline.ingest_candidate(&text).await;
    let analysis_failed = analysis.is_failed();
    if let Some(cause) = analysis.cause() {
        warn!(filename, "Storing placeholder candidate after failed extraction: {cause}");
    }

    let hash = filehash.clone();
    let candidate = NewCandidate {
        cv_name: filename.to_string(),
        filehash,
        attributes: analysis.into_value(),
    };
    match store.insert_candidate(candidate).await {
        Ok(Some(row)) => {
            info!(filename, candidate_id = %row.id, "Candidate stored");
            UploadStatus::Success {
                candidate_id: row.id,
                analysis_failed,
            }
        }
        // Same content stored by a concurrent upload since the lookup above.
        Ok(None) => match store.find_candidate_by_hash(&hash).await {
            Ok(Some(existing)) => {
                info!(filename, candidate_id = %existing.id, "Duplicate CV skipped");
                UploadStatus::Skipped {
                    candidate_id: existing.id,
                    message: format!("already uploaded as {}", existing.cv_name),
                }
            }
            Ok(None) => UploadStatus::Error {
                message: "could not store candidate".to_string(),
            },
            Err(e) => {
                error!(filename, "Hash lookup failed: {e:?}");
                UploadStatus::Error {
                    message: "could not store candidate".to_string(),
                }
            }
        },
        Err(e) => {
            error!(filename, "Candidate insert failed: {e:?}");
            UploadStatus::Error {
                message: "could not store candidate".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::documents::testing::docx_with_text;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::store::memory::MemoryStore;

    const LIMIT: usize = 1024 * 1024;

    fn pipeline(reply: &str) -> (Pipeline, Arc<ScriptedBackend>) {
        let llm = Arc::new(ScriptedBackend::text(reply));
        (Pipeline::new(llm.clone()), llm)
    }

    #[tokio::test]
    async fn test_docx_upload_is_stored() {
        let store = MemoryStore::new();
        let (pipeline, _) = pipeline(r#"{"candidate_name": "Jane Doe", "sql": 1}"#);

        let result = ingest_file(
            &store,
            &pipeline,
            "jane.docx".to_string(),
            docx_with_text("Jane Doe, SQL"),
            LIMIT,
        )
        .await;

        let UploadStatus::Success {
            candidate_id,
            analysis_failed,
        } = result.status
        else {
            panic!("unexpected status {:?}", result.status);
        };
        assert!(!analysis_failed);
        let row = store.get_candidate(candidate_id).await.unwrap().unwrap();
        assert_eq!(row.cv_name, "jane.docx");
        assert_eq!(row.attributes.candidate_name, "Jane Doe");
        assert_eq!(row.attributes.sql, 1);
    }

    #[tokio::test]
    async fn test_same_content_is_skipped() {
        let store = MemoryStore::new();
        let (pipeline, llm) = pipeline(r#"{"candidate_name": "Jane"}"#);
        let bytes = docx_with_text("Jane");

        let first = ingest_file(&store, &pipeline, "a.docx".into(), bytes.clone(), LIMIT).await;
        let second = ingest_file(&store, &pipeline, "b.docx".into(), bytes, LIMIT).await;

        let UploadStatus::Success { candidate_id, .. } = first.status else {
            panic!("first upload failed");
        };
        assert!(matches!(
            second.status,
            UploadStatus::Skipped { candidate_id: id, .. } if id == candidate_id
        ));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_of_same_content() {
        let store = MemoryStore::new();
        let (pipeline, _) = pipeline(r#"{"candidate_name": "Jane"}"#);
        let bytes = docx_with_text("Jane");

        let (a, b) = tokio::join!(
            ingest_file(&store, &pipeline, "a.docx".into(), bytes.clone(), LIMIT),
            ingest_file(&store, &pipeline, "b.docx".into(), bytes, LIMIT),
        );

        let ids: Vec<Uuid> = [&a.status, &b.status]
            .into_iter()
            .filter_map(|status| match status {
                UploadStatus::Success { candidate_id, .. } => Some(*candidate_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), 1, "a={:?} b={:?}", a.status, b.status);
        let skipped = [&a.status, &b.status].into_iter().find_map(|status| match status {
            UploadStatus::Skipped { candidate_id, .. } => Some(*candidate_id),
            _ => None,
        });
        assert_eq!(skipped, Some(ids[0]));
        assert_eq!(store.all_candidates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_error() {
        let store = MemoryStore::new();
        let (pipeline, llm) = pipeline("{}");

        let result = ingest_file(&store, &pipeline, "cv.txt".into(), b"text".to_vec(), LIMIT).await;
        assert!(matches!(result.status, UploadStatus::Error { .. }));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_is_error() {
        let store = MemoryStore::new();
        let (pipeline, _) = pipeline("{}");

        let result =
            ingest_file(&store, &pipeline, "big.docx".into(), docx_with_text("Jane"), 10).await;
        assert!(matches!(result.status, UploadStatus::Error { .. }));
    }

    #[tokio::test]
    async fn test_failed_extraction_stores_placeholder() {
        let store = MemoryStore::new();
        let llm = Arc::new(ScriptedBackend::failing(503));
        let pipeline = Pipeline::new(llm);

        let result =
            ingest_file(&store, &pipeline, "jane.docx".into(), docx_with_text("Jane"), LIMIT).await;
        let UploadStatus::Success {
            candidate_id,
            analysis_failed,
        } = result.status
        else {
            panic!("unexpected status {:?}", result.status);
        };
        assert!(analysis_failed);
        let row = store.get_candidate(candidate_id).await.unwrap().unwrap();
        assert_eq!(row.attributes.candidate_name, "Unknown");
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let result = UploadResult {
            filename: "cv.txt".to_string(),
            status: UploadStatus::Error {
                message: "nope".to_string(),
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["filename"], "cv.txt");
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "nope");
    }
}
