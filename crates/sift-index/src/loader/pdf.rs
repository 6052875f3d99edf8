use std::path::Path;
use std::pin::Pin;

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, base_name};
use crate::error::RetrievalError;
use crate::types::{Document, DocumentMetadata};

/// PDF loader producing one document per page.
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, RetrievalError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;

            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() > max_size {
                return Err(RetrievalError::FileTooLarge(meta.len()));
            }

            let source_file = base_name(&path);
            let path_buf = path.clone();
            // pdf-extract is synchronous; parse off the async runtime.
            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_by_pages(&path_buf)
                    .map_err(|e| RetrievalError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| RetrievalError::Io(std::io::Error::other(e)))??;

            Ok(pages
                .into_iter()
                .enumerate()
                .map(|(page, content)| Document {
                    content,
                    metadata: DocumentMetadata {
                        source_file: source_file.clone(),
                        page,
                        content_type: "application/pdf".to_owned(),
                    },
                })
                .collect())
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
