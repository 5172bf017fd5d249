/// Convenience result type used across the crate.
pub type DissolveResult<T> = Result<T, DissolveError>;

/// Top-level error taxonomy used by preloader and engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum DissolveError {
    /// A requested image could not be fetched or decoded. The whole batch is aborted.
    #[error("failed to load image '{locator}': {source}")]
    LoadFailure {
        /// Locator exactly as the caller requested it.
        locator: String,
        /// Underlying fetch/decode error.
        #[source]
        source: anyhow::Error,
    },

    /// The target surface has no usable context or a zero-area size.
    #[error("invalid surface state: {0}")]
    InvalidSurfaceState(String),

    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DissolveError {
    /// Build a [`DissolveError::LoadFailure`] value.
    pub fn load_failure(locator: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::LoadFailure {
            locator: locator.into(),
            source: source.into(),
        }
    }

    /// Build a [`DissolveError::InvalidSurfaceState`] value.
    pub fn invalid_surface(msg: impl Into<String>) -> Self {
        Self::InvalidSurfaceState(msg.into())
    }

    /// Build a [`DissolveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DissolveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Locator of the image that failed to load, if this is a load failure.
    pub fn failed_locator(&self) -> Option<&str> {
        match self {
            Self::LoadFailure { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
