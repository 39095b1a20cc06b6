use super::BoxError;
use super::types::{Error, Kind};

/// Creates an `Error` for malformed streamed JSON.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e.into())
}

/// Creates an `Error` for an upstream or connection failure.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport).with(e.into())
}

/// Creates an `Error` for an unreadable cache entry.
pub fn cache_corruption<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::CacheCorruption).with(e.into())
}

/// Creates an `Error` for a cache storage failure.
pub fn store<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Store).with(e.into())
}

/// Creates an `Error` for an unparseable path pattern.
pub fn invalid_path<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::InvalidPath).with(e.into())
}

/// Creates an `Error` for a query that cannot be used as a cache key.
pub fn invalid_query<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::InvalidQuery).with(e.into())
}

pub fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config).with(e.into())
}

pub fn runtime<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Runtime).with(e.into())
}

pub fn cancelled() -> Error {
    Error::new(Kind::Cancelled)
}
