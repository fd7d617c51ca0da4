//! Typed failures for the transcription layer.
//!
//! Every adapter failure is normalized into one of the [`SttErrorKind`]
//! variants before it crosses the adapter boundary. Retryability is derived
//! from the kind, never set per call site, so the provider-fallback loop can
//! make a uniform decision about whether an attempt was worth repeating on a
//! different provider.

/// Closed set of transcription failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SttErrorKind {
    /// The provider rejected the credential (HTTP 401/403).
    Unauthorized,
    /// Transport-level failure: connection refused, DNS, TLS, etc.
    NetworkError,
    /// The operation did not complete within its deadline, including
    /// user-initiated cancellation.
    Timeout,
    /// The provider reported a terminal job failure.
    ProviderError,
    /// The provider succeeded but produced no usable text.
    EmptyTranscript,
}

impl SttErrorKind {
    /// Stable identifier, used in logs and persisted session records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SttErrorKind::Unauthorized => "unauthorized",
            SttErrorKind::NetworkError => "network_error",
            SttErrorKind::Timeout => "timeout",
            SttErrorKind::ProviderError => "provider_error",
            SttErrorKind::EmptyTranscript => "empty_transcript",
        }
    }

    /// Whether another attempt (on this or another provider) can reasonably
    /// succeed. Fixed per kind.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SttErrorKind::NetworkError | SttErrorKind::Timeout)
    }
}

/// A transcription failure: a [`SttErrorKind`] plus an optional underlying
/// message from the transport or the provider.
#[derive(Debug, Clone)]
pub struct SttError {
    kind: SttErrorKind,
    message: Option<String>,
}

impl std::fmt::Display for SttError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{}: {}", self.kind.as_str(), m),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

impl std::error::Error for SttError {}

impl SttError {
    pub fn new(kind: SttErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: SttErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> SttErrorKind {
        self.kind
    }

    /// Derived from the kind; see [`SttErrorKind::is_retryable`].
    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Classifies a non-success HTTP status from a provider endpoint.
    ///
    /// 401/403 mean the credential was rejected; anything else is treated as
    /// an upstream-reported failure.
    pub fn from_status(provider: &str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::with_message(
                SttErrorKind::Unauthorized,
                format!("{provider} rejected the API key (status {status})"),
            ),
            _ => Self::with_message(
                SttErrorKind::ProviderError,
                format!("{provider} API error (status {status}): {body}"),
            ),
        }
    }
}

impl From<reqwest::Error> for SttError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SttError::with_message(SttErrorKind::Timeout, e.to_string())
        } else {
            SttError::with_message(SttErrorKind::NetworkError, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_is_fixed_per_kind() {
        assert!(!SttError::new(SttErrorKind::Unauthorized).retryable());
        assert!(SttError::new(SttErrorKind::NetworkError).retryable());
        assert!(SttError::new(SttErrorKind::Timeout).retryable());
        assert!(!SttError::new(SttErrorKind::ProviderError).retryable());
        assert!(!SttError::new(SttErrorKind::EmptyTranscript).retryable());
    }

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = SttError::from_status("AssemblyAI", 401, "unauthorized");
        assert_eq!(err.kind(), SttErrorKind::Unauthorized);
        assert!(!err.retryable());
    }

    #[test]
    fn status_500_maps_to_provider_error() {
        let err = SttError::from_status("Deepgram", 500, "internal");
        assert_eq!(err.kind(), SttErrorKind::ProviderError);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = SttError::with_message(SttErrorKind::Timeout, "polling deadline reached");
        assert_eq!(err.to_string(), "timeout: polling deadline reached");
        assert_eq!(SttError::new(SttErrorKind::Timeout).to_string(), "timeout");
    }
}
