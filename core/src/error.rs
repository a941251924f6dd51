//! Error types for the HTTP template.
//!
//! # Design
//! Every failure that leaves `HttpTemplate` is an `HttpError` carrying a
//! numeric code and a fixed message taken from its `ErrorKind`. Messages
//! never include the underlying cause; the cause is kept as the error's
//! `source()` so it stays available for logging without leaking into the
//! message callers match on.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error accepted from result parsers and transports.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The recognized failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The response, or its body, is missing.
    ResponseEmpty,
    /// The response status is not 200.
    ResponseStatusInvalid,
    /// The request method is neither GET nor POST.
    UnsupportedRequestMethod,
    /// Any other failure during transport, decoding or parsing.
    SystemInternalError,
    /// Releasing the transport failed.
    CloseChannelError,
}

impl ErrorKind {
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::ResponseEmpty => 10001,
            ErrorKind::ResponseStatusInvalid => 10002,
            ErrorKind::UnsupportedRequestMethod => 10003,
            ErrorKind::SystemInternalError => 10004,
            ErrorKind::CloseChannelError => 10005,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::ResponseEmpty => "response is empty",
            ErrorKind::ResponseStatusInvalid => "response status code is invalid",
            ErrorKind::UnsupportedRequestMethod => "unsupported request method",
            ErrorKind::SystemInternalError => "system internal error",
            ErrorKind::CloseChannelError => "failed to close http channel",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The single failure type returned by `HttpTemplate`.
#[derive(Debug, Error)]
#[error("[{code}] {message}", code = .kind.code(), message = .kind.message())]
pub struct HttpError {
    kind: ErrorKind,
    status: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            status: None,
            source: None,
        }
    }

    pub fn response_empty() -> Self {
        Self::new(ErrorKind::ResponseEmpty)
    }

    pub fn status_invalid(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::ResponseStatusInvalid)
        }
    }

    pub fn unsupported_method() -> Self {
        Self::new(ErrorKind::UnsupportedRequestMethod)
    }

    /// Wrap an arbitrary failure as `SystemInternalError`.
    ///
    /// An `HttpError` passed in boxed form is returned unchanged rather than
    /// wrapped a second time.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        match cause.into().downcast::<HttpError>() {
            Ok(err) => *err,
            Err(other) => Self {
                source: Some(other),
                ..Self::new(ErrorKind::SystemInternalError)
            },
        }
    }

    pub fn close_channel(cause: impl Into<BoxError>) -> Self {
        Self {
            source: Some(cause.into()),
            ..Self::new(ErrorKind::CloseChannelError)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// The offending status for `ResponseStatusInvalid`.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Errors raised by a `Transport` or `Connector`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Ureq(#[from] ureq::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        HttpError::internal(err)
    }
}
