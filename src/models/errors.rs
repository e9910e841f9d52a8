//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so logs and API responses can be
//! correlated without parsing messages.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - DOMAIN_xxx: input parsing errors
//! - PROVIDER_xxx / ALL_SOURCES_xxx: signal aggregation errors
//! - RULE_xxx / HISTORY_xxx: collaborator I/O errors
//! - API_xxx / CFG_xxx: front end and configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Domain Input Errors (1xx)
    // ============================================
    /// Input has no TLD separator or an empty label
    DomainInvalidFormat,

    // ============================================
    // Signal Errors (2xx)
    // ============================================
    /// A single signal provider failed
    ProviderError,
    /// A single signal provider exceeded its deadline
    ProviderTimeout,
    /// Every provider failed and nothing was cached
    AllSourcesFailed,

    // ============================================
    // Collaborator Errors (3xx)
    // ============================================
    /// Rule lookup failed
    RuleStoreError,
    /// History write failed
    HistoryWriteError,

    // ============================================
    // API Errors (4xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors (5xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainInvalidFormat => "DOMAIN_INVALID_FORMAT",

            Self::ProviderError => "PROVIDER_ERROR",
            Self::ProviderTimeout => "PROVIDER_TIMEOUT",
            Self::AllSourcesFailed => "ALL_SOURCES_FAILED",

            Self::RuleStoreError => "RULE_STORE_ERROR",
            Self::HistoryWriteError => "HISTORY_WRITE_ERROR",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::DomainInvalidFormat | Self::ConfigInvalidValue => 400,
            Self::AllSourcesFailed => 503,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderError | Self::ProviderTimeout | Self::AllSourcesFailed
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Unparseable domain input
    pub fn invalid_format(input: &str) -> Self {
        Self::new(
            ErrorCode::DomainInvalidFormat,
            format!("Invalid domain format: {}", input),
        )
    }

    /// One signal provider failed
    pub fn provider(provider: &str, msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderError, format!("{}: {}", provider, msg.into()))
    }

    /// One signal provider exceeded its deadline
    pub fn provider_timeout(provider: &str, timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::ProviderTimeout,
            format!("{}: no response within {}ms", provider, timeout_ms),
        )
    }

    /// Every provider failed; `failures` are the collected provider errors
    pub fn all_sources_failed(failures: &[AppError]) -> Self {
        let joined = failures
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            ErrorCode::AllSourcesFailed,
            format!("All signal sources failed: {}", joined),
        )
    }

    /// Rule lookup failed
    pub fn rule_store(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RuleStoreError, msg)
    }

    /// History write failed
    pub fn history_write(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::HistoryWriteError, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Check if the operation may succeed when retried
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// True if this error means the input itself could not be parsed
    pub fn is_invalid_format(&self) -> bool {
        self.code == ErrorCode::DomainInvalidFormat
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::RuleStoreError, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::RuleStoreError, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::invalid_format("localhost");
        assert_eq!(err.code, ErrorCode::DomainInvalidFormat);
        assert_eq!(err.code_str(), "DOMAIN_INVALID_FORMAT");
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_all_sources_failed_joins_messages() {
        let failures = vec![
            AppError::provider("whois", "connection refused"),
            AppError::provider_timeout("rank", 5000),
        ];
        let err = AppError::all_sources_failed(&failures);
        assert_eq!(err.code, ErrorCode::AllSourcesFailed);
        assert!(err.message.contains("whois: connection refused"));
        assert!(err.message.contains("; "));
        assert!(err.message.contains("rank: no response within 5000ms"));
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::ProviderTimeout.is_retryable());
        assert!(ErrorCode::AllSourcesFailed.is_retryable());
        assert!(!ErrorCode::DomainInvalidFormat.is_retryable());
        assert!(AppError::provider("rank", "reset by peer").is_retryable());
        assert!(!AppError::rule_store("missing table").is_retryable());
    }

    #[test]
    fn test_code_strings() {
        assert_eq!(ErrorCode::Unknown.as_str(), "UNKNOWN");
        assert_eq!(ErrorCode::ApiBadRequest.as_str(), "API_BAD_REQUEST");
        assert_eq!(ErrorCode::ConfigInvalidValue.as_str(), "CFG_INVALID_VALUE");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::DomainInvalidFormat.http_status(), 400);
        assert_eq!(ErrorCode::AllSourcesFailed.http_status(), 503);
        assert_eq!(ErrorCode::RuleStoreError.http_status(), 500);
    }
}
