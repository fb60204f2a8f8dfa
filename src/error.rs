//! Error types for scriba.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribaError {
    // Audio decode errors
    #[error("Failed to decode audio: {message}")]
    Decode { message: String },

    // Remote transcription errors
    #[error("Transcription service unavailable: {message}")]
    RemoteUnavailable { message: String },

    #[error("Transcription did not complete within {seconds}s")]
    RemoteTimeout { seconds: u64 },

    #[error("Transcription request rejected: {message}")]
    RemoteRejected { message: String },

    // Assembly contract violations (chunk ordering/indexing)
    #[error("Transcript assembly failed: {message}")]
    Assembly { message: String },

    // Job-level errors
    #[error("Unsupported language code: {code}")]
    UnsupportedLanguage { code: String },

    #[error("Storage sink error: {message}")]
    Storage { message: String },

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl ScribaError {
    /// Whether a retry with backoff may succeed.
    ///
    /// Only service unavailability is transient; timeouts and rejections
    /// escalate immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScribaError::RemoteUnavailable { .. })
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScribaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_display() {
        let error = ScribaError::Decode {
            message: "not a WAV stream".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to decode audio: not a WAV stream");
    }

    #[test]
    fn test_remote_unavailable_display() {
        let error = ScribaError::RemoteUnavailable {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription service unavailable: connection refused"
        );
    }

    #[test]
    fn test_remote_timeout_display() {
        let error = ScribaError::RemoteTimeout { seconds: 900 };
        assert_eq!(
            error.to_string(),
            "Transcription did not complete within 900s"
        );
    }

    #[test]
    fn test_remote_rejected_display() {
        let error = ScribaError::RemoteRejected {
            message: "unsupported sample rate".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription request rejected: unsupported sample rate"
        );
    }

    #[test]
    fn test_assembly_display() {
        let error = ScribaError::Assembly {
            message: "chunk index 3 missing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcript assembly failed: chunk index 3 missing"
        );
    }

    #[test]
    fn test_unsupported_language_display() {
        let error = ScribaError::UnsupportedLanguage {
            code: "de".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported language code: de");
    }

    #[test]
    fn test_storage_display() {
        let error = ScribaError::Storage {
            message: "write failed".to_string(),
        };
        assert_eq!(error.to_string(), "Storage sink error: write failed");
    }

    #[test]
    fn test_other_display() {
        let error = ScribaError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_is_transient() {
        assert!(
            ScribaError::RemoteUnavailable {
                message: "503".to_string()
            }
            .is_transient()
        );
        assert!(!ScribaError::RemoteTimeout { seconds: 1 }.is_transient());
        assert!(
            !ScribaError::RemoteRejected {
                message: "bad audio".to_string()
            }
            .is_transient()
        );
        assert!(
            !ScribaError::Decode {
                message: "truncated".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(ScribaError::Other("test error".to_string()))
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ScribaError>();
        assert_sync::<ScribaError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = ScribaError::Decode {
            message: "bad header".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("Decode"));
        assert!(debug_str.contains("bad header"));
    }
}
