#[derive(Debug, thiserror::Error)]
pub enum KalkylError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to build workbook: {0}")]
    Workbook(String),

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("no input documents given")]
    EmptyBatch,

    #[error("all documents failed to convert")]
    AllFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
