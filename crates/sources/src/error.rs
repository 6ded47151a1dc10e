//! Failure taxonomy shared by the three source readers.

/// A source-level failure.
///
/// Both variants are terminal for the whole session: no candidates
/// could be decoded at all. Zero decoded candidates is deliberately NOT
/// an error; the orchestrator logs it and completes.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network-level failure: DNS, connect, timeout, or a non-2xx
    /// response.
    #[error("source unreachable: {0}")]
    Unreachable(String),

    /// The payload was fetched but could not be decoded into the
    /// expected shape.
    #[error("source format invalid: {0}")]
    FormatInvalid(String),
}

impl SourceError {
    /// Classify a `reqwest` failure for the given URL.
    ///
    /// Timeouts count as unreachable (the conservative default the
    /// fetch client enforces); body-decode failures count as format
    /// errors.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::FormatInvalid(format!("{url}: {err}"))
        } else {
            Self::Unreachable(format!("{url}: {err}"))
        }
    }
}
