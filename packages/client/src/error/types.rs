use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A Result alias where the Err case is `mindstream_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while opening, streaming or caching a mind map.
///
/// Cloning is cheap and keeps the source chain, so a single terminal failure
/// can be handed to every consumer attached to a session.
#[derive(Clone)]
pub struct Error {
    pub inner: Box<Inner>,
}

#[derive(Clone)]
pub struct Inner {
    pub kind: Kind,
    pub source: Option<Arc<dyn StdError + Send + Sync>>,
    /// Normalized cache key of the session the error belongs to
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Malformed JSON in the fragment sequence
    Decode,
    /// Upstream signaled failure or the connection dropped
    Transport,
    /// Persisted cache entry could not be decoded
    CacheCorruption,
    /// Cache storage I/O failure
    Store,
    /// Target path pattern could not be parsed
    InvalidPath,
    /// Query normalized to an empty key
    InvalidQuery,
    /// Configuration rejected by validation
    Config,
    /// No async runtime available to drive a session
    Runtime,
    /// Session was cancelled before reaching a terminal state
    Cancelled,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                key: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(Arc::from(source.into()));
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.inner.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Cache key of the session this error was raised for, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        self.inner.kind == Kind::Decode
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.inner.kind == Kind::Transport
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.kind == Kind::Cancelled
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("mindstream::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref key) = self.inner.key {
            f.field("key", key);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.inner.kind {
            Kind::Decode => "error decoding streamed document",
            Kind::Transport => "stream transport error",
            Kind::CacheCorruption => "corrupted cache entry",
            Kind::Store => "cache storage error",
            Kind::InvalidPath => "invalid path pattern",
            Kind::InvalidQuery => "invalid query",
            Kind::Config => "invalid configuration",
            Kind::Runtime => "no async runtime available",
            Kind::Cancelled => "session cancelled",
        };
        match &self.inner.source {
            Some(source) => write!(f, "{prefix}: {source}"),
            None => f.write_str(prefix),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<crate::jsonpath::error::DecodeError> for Error {
    fn from(err: crate::jsonpath::error::DecodeError) -> Self {
        Error::new(Kind::Decode).with(err)
    }
}

impl From<crate::config::ConfigurationError> for Error {
    fn from(err: crate::config::ConfigurationError) -> Self {
        Error::new(Kind::Config).with(err)
    }
}
