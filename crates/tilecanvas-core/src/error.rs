use thiserror::Error;

/// Reasons a textual chunk key can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// The key does not contain the `", "` separator exactly once
    #[error("chunk key {0:?} is not of the form \"x, y\"")]
    Malformed(String),
    /// One of the components is not an integer
    #[error("chunk key {key:?} has a non-integer component {component:?}")]
    InvalidComponent { key: String, component: String },
}

/// Errors raised by the chunk engine and its rendering backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// A chunk image was drawn before it finished loading.
    ///
    /// Transient: the chunk is skipped for the current pass and picked up
    /// again by the next pan or refresh.
    #[error("chunk image is not ready to be drawn")]
    ImageNotReady,

    #[error("surface error: {0}")]
    Surface(String),

    #[error("failed to encode chunk image: {0}")]
    Encode(String),

    #[error("failed to decode chunk image: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid chunk key: {0}")]
    InvalidKey(#[from] KeyParseError),
}

impl CanvasError {
    /// Whether the failure only affects the current frame
    pub fn is_transient(&self) -> bool {
        matches!(self, CanvasError::ImageNotReady)
    }

    /// Short machine-readable code, used when the error crosses into JS
    pub fn code(&self) -> &'static str {
        match self {
            CanvasError::ImageNotReady => "IMAGE_NOT_READY",
            CanvasError::Surface(_) => "SURFACE_ERROR",
            CanvasError::Encode(_) => "ENCODE_ERROR",
            CanvasError::Decode(_) => "DECODE_ERROR",
            CanvasError::InvalidConfig(_) => "INVALID_CONFIG",
            CanvasError::InvalidKey(_) => "INVALID_KEY",
        }
    }
}

pub type Result<T> = std::result::Result<T, CanvasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_ready_is_transient() {
        assert!(CanvasError::ImageNotReady.is_transient());
        assert!(!CanvasError::Surface("boom".into()).is_transient());
        assert!(!CanvasError::Decode("bad png".into()).is_transient());
    }

    #[test]
    fn test_key_error_converts() {
        let err: CanvasError = KeyParseError::Malformed("1,2".into()).into();
        assert_eq!(err.code(), "INVALID_KEY");
        assert_eq!(
            err.to_string(),
            "invalid chunk key: chunk key \"1,2\" is not of the form \"x, y\""
        );
    }
}
