use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "request.ticker")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "dispatcher", "client_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Volland client.
///
/// Variants fall into two groups. Batch-level errors (transport, quota, ordering,
/// token budget) lose every request of the batch in flight; item-level errors
/// (`ItemDecode`, `UnknownResponseKind`) only skip a single reply node.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API error 401: missing or invalid API key, or no live subscription")]
    Auth,

    #[error("API error 400: request JSON is not in the expected format{}", format_reason(.reason))]
    MalformedRequest { reason: Option<String> },

    #[error("API error 429: no API credits left")]
    QuotaExhausted,

    #[error("API request timed out")]
    TransportTimeout,

    #[error("API internal server error")]
    RemoteInternal,

    #[error("HTTP request unsuccessful: status {status}{}", format_reason(.reason))]
    UnclassifiedTransport { status: u16, reason: Option<String> },

    #[error("responses do not align with requests: sent {expected}, received {received}")]
    OrderingMismatch { expected: usize, received: usize },

    #[error("failed to decode reply node {index}: {message}")]
    ItemDecode { index: usize, message: String },

    #[error("reply node {index} has unrecognized request_type {tag:?}")]
    UnknownResponseKind { index: usize, tag: String },

    #[error("not enough API tokens: requested {requested}, remaining {remaining}")]
    InsufficientTokens { requested: u64, remaining: u64 },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },
}

fn format_reason(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.is_empty() => format!(" ({})", r),
        _ => String::new(),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Map a non-2xx HTTP status to its error kind.
    pub fn from_status(status: u16, reason: Option<String>) -> Self {
        match status {
            401 => Error::Auth,
            400 => Error::MalformedRequest { reason },
            429 => Error::QuotaExhausted,
            408 => Error::TransportTimeout,
            500 => Error::RemoteInternal,
            _ => Error::UnclassifiedTransport { status, reason },
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Whether this error discards the whole batch rather than a single reply node.
    pub fn is_batch_fatal(&self) -> bool {
        !matches!(
            self,
            Error::ItemDecode { .. } | Error::UnknownResponseKind { .. }
        )
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
