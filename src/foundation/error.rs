/// Convenience result type used across ingot.
pub type IngotResult<T> = Result<T, IngotError>;

/// Top-level error taxonomy used by loader, mapper and compositor APIs.
///
/// Every variant is terminal for the current render attempt. Use [`IngotError::is_retryable`]
/// to decide whether a retry affordance makes sense.
#[derive(thiserror::Error, Debug)]
pub enum IngotError {
    /// The image source could not be fetched (connection failure, non-2xx status, missing file).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The image source did not answer within the configured wait bound.
    #[error("image load timed out after {0}ms")]
    Timeout(u64),

    /// Bytes were fetched but could not be decoded as a supported image.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// Base image bounds are empty or non-finite (image not laid out yet).
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// Neither text nor logo content was supplied.
    #[error("no engraving content supplied")]
    NoContent,

    /// Text content is blank after trimming.
    #[error("engraving text is empty")]
    EmptyText,

    /// A logo was requested but its bitmap is not available.
    #[error("logo unavailable: {0}")]
    LogoUnavailable(String),

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IngotError {
    /// Build a [`IngotError::NetworkFailure`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkFailure(msg.into())
    }

    /// Build a [`IngotError::DecodeFailure`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeFailure(msg.into())
    }

    /// Build a [`IngotError::InvalidBounds`] value.
    pub fn invalid_bounds(msg: impl Into<String>) -> Self {
        Self::InvalidBounds(msg.into())
    }

    /// Build a [`IngotError::LogoUnavailable`] value.
    pub fn logo_unavailable(msg: impl Into<String>) -> Self {
        Self::LogoUnavailable(msg.into())
    }

    /// Build a [`IngotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` when re-running the same request may succeed (network and timeout failures).
    ///
    /// Input errors (`NoContent`, `EmptyText`, ...) need the user to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkFailure(_) | Self::Timeout(_) | Self::LogoUnavailable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
