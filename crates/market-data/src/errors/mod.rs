//! Error types for the market data crate.
//!
//! Malformed vendor payloads are deliberately absent from this enum: the
//! provider coerces them into zero-valued records instead of failing.

use thiserror::Error;

/// Errors that can occur while talking to the upstream ETF data vendor.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The vendor rejected the request with HTTP 429.
    ///
    /// Callers treat this as authoritative and exhaust the local rate budget.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request did not complete within the client timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The vendor answered with a non-2xx status or an unreadable body.
    #[error("Upstream error: {provider} - {message}")]
    Upstream {
        /// The provider that returned the error
        provider: String,
        /// HTTP status, when the failure came from a response
        status: Option<u16>,
        /// Human-readable description of the failure
        message: String,
    },

    /// A transport-level failure (DNS, connection refused, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The requested symbol is not one of the supported ETF families.
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),
}

impl MarketDataError {
    /// Returns true when the vendor itself signalled rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Upstream { status, .. } => *status,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Timeout { .. } | Self::UnsupportedSymbol(_) => None,
        }
    }
}
