// ABOUTME: Error types for og-report including the ErrorCode enum and ReportError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the ways a report run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingUrl,
    InvalidUrl,
    Navigation,
    Timeout,
    MalformedCandidateUrl,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::MissingUrl => "missing URL",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Navigation => "navigation failed",
            ErrorCode::Timeout => "timeout",
            ErrorCode::MalformedCandidateUrl => "malformed candidate URL",
            ErrorCode::Io => "i/o error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for every fallible step of a report run.
#[derive(Debug, thiserror::Error)]
pub struct ReportError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "og-report: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ReportError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a MissingUrl error.
    pub fn missing_url(op: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingUrl,
            "",
            op,
            Some(anyhow::anyhow!("a URL to report on is required")),
        )
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Navigation error.
    pub fn navigation(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Navigation, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a MalformedCandidateUrl error. `url` is the offending candidate value.
    pub fn malformed_candidate_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::MalformedCandidateUrl, url, op, source)
    }

    /// Create an Io error.
    pub fn io(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Io, url, op, source)
    }

    /// Returns true if this is a MissingUrl error.
    pub fn is_missing_url(&self) -> bool {
        self.code == ErrorCode::MissingUrl
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Navigation error.
    pub fn is_navigation(&self) -> bool {
        self.code == ErrorCode::Navigation
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a MalformedCandidateUrl error.
    pub fn is_malformed_candidate_url(&self) -> bool {
        self.code == ErrorCode::MalformedCandidateUrl
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}
