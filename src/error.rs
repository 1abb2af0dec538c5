use crate::core::types::{ErrorDoc, ErrorType};

/// The three documented error kinds (spec §7). `FetchFailed` is reserved —
/// individual sub-fetch failures degrade the report as constraints, they
/// never surface as a top-level error — but it stays part of the type so the
/// vocabulary matches the spec exactly.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{0}")]
    InvalidUrl(String),
    #[error("{0}")]
    InsufficientData(String),
    #[error("{0}")]
    FetchFailed(String),
}

impl From<ScanError> for ErrorDoc {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidUrl(msg) => ErrorDoc::new(ErrorType::InvalidUrl, msg),
            ScanError::InsufficientData(msg) => ErrorDoc::new(ErrorType::InsufficientData, msg),
            ScanError::FetchFailed(msg) => ErrorDoc::new(ErrorType::FetchFailed, msg),
        }
    }
}
