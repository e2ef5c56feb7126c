//! Provider contract and the fetch-failure classification.
//!
//! A [`FundamentalsProvider`] hands back one decoded [`ProviderPayload`] per
//! ticker. Transport lives outside this crate; implementations wrap whatever
//! client they use and report failures as [`ProviderFetchError`], which the
//! normalizer turns into warnings.

use std::fmt::{Display, Formatter};

use crate::normalizer::ProviderPayload;
use crate::Ticker;

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFetchErrorKind {
    Unavailable,
    RateLimited,
    NotFound,
    InvalidResponse,
    Internal,
}

/// Structured fetch failure reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFetchError {
    kind: ProviderFetchErrorKind,
    message: String,
    retryable: bool,
}

impl ProviderFetchError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderFetchErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderFetchErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(ticker: &Ticker) -> Self {
        Self {
            kind: ProviderFetchErrorKind::NotFound,
            message: format!("no fundamentals for '{ticker}'"),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderFetchErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderFetchErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ProviderFetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderFetchErrorKind::Unavailable => "provider.unavailable",
            ProviderFetchErrorKind::RateLimited => "provider.rate_limited",
            ProviderFetchErrorKind::NotFound => "provider.not_found",
            ProviderFetchErrorKind::InvalidResponse => "provider.invalid_response",
            ProviderFetchErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderFetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderFetchError {}

impl From<serde_json::Error> for ProviderFetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::invalid_response(format!("malformed payload: {value}"))
    }
}

/// Source of raw fundamentals for one ticker.
///
/// Implementations must be `Send + Sync`; tickers are normalized
/// independently and may be dispatched across threads.
pub trait FundamentalsProvider: Send + Sync {
    /// Short identifier used in warnings and logs.
    fn name(&self) -> &str;

    /// Returns the provider's payload for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderFetchError`] when the provider cannot be reached,
    /// throttles the caller, has no data for the ticker, or answers with
    /// something that does not decode.
    fn fetch(&self, ticker: &Ticker) -> Result<ProviderPayload, ProviderFetchError>;
}

/// Provider backed by an already-fetched JSON document.
///
/// Decoding happens on [`fetch`](FundamentalsProvider::fetch), so a malformed
/// or unreadable document surfaces as an ordinary fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayloadProvider {
    name: String,
    body: Result<String, String>,
}

impl JsonPayloadProvider {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Ok(body.into()),
        }
    }

    /// Document that could not be read. Every fetch fails as unavailable.
    pub fn unreadable(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            name: name.into(),
            body: Err(reason.to_string()),
        }
    }

    /// Wrap the outcome of reading the document from disk.
    pub fn from_read(name: impl Into<String>, read: std::io::Result<String>) -> Self {
        match read {
            Ok(body) => Self::new(name, body),
            Err(error) => Self::unreadable(name, format!("unreadable payload: {error}")),
        }
    }
}

impl FundamentalsProvider for JsonPayloadProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, ticker: &Ticker) -> Result<ProviderPayload, ProviderFetchError> {
        let body = self
            .body
            .as_deref()
            .map_err(|reason| ProviderFetchError::unavailable(reason.to_owned()))?;
        if body.trim().is_empty() {
            return Err(ProviderFetchError::not_found(ticker));
        }
        Ok(ProviderPayload::from_json(body)?)
    }
}
