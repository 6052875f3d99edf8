#[cfg(feature = "pdf")]
pub mod pdf;
pub mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

use crate::error::RetrievalError;
use crate::types::Document;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Loads one source file into page-level documents.
pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, RetrievalError>> + Send + '_>,
    >;

    /// Lowercase extensions this loader handles.
    fn supported_extensions(&self) -> &[&str];
}

pub(crate) fn base_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
