use thiserror::Error;

/// Structural failures of the extraction pipeline. Neither is retried; the
/// page is not an article page in the expected layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("malformed page: boilerplate notice {0:?} not found")]
    MissingStartMarker(&'static str),

    #[error("malformed page: title heading not found")]
    TitleNotFound,
}
