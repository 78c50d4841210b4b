/// Result alias that carries the custom [`TranscoderError`] type.
pub type Result<T> = std::result::Result<T, TranscoderError>;

/// Common error type for the core crate.
///
/// Encoding, decoding and playback never fail: unmapped input degrades to the
/// unknown marker and sink trouble degrades the session status. Errors only
/// surface while loading configuration or handling command line input.
#[derive(Debug, thiserror::Error)]
pub enum TranscoderError {
    /// Command line input the binary cannot act on, such as a `symbol`
    /// argument with no code in the table.
    #[error("{0}")]
    Message(String),
    /// Configuration file could not be read, or stdout could not be written.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration parsed but holds values the scheduler cannot honour.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<String> for TranscoderError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_display_verbatim() {
        let err: TranscoderError = format!("`{}` has no code in the table", '#').into();
        assert!(matches!(err, TranscoderError::Message(_)));
        assert_eq!(err.to_string(), "`#` has no code in the table");
    }

    #[test]
    fn invalid_config_is_prefixed() {
        let err = TranscoderError::InvalidConfig("playback.unit_ms must be greater than zero".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: playback.unit_ms must be greater than zero"
        );
    }
}
