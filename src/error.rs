//! Unified error type.

use std::fmt;

/// The error type returned by strata's fallible operations.
///
/// Application-level outcomes (404, 405, 422, ...) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// two things: route patterns the multiplexer refuses at registration time,
/// and infrastructure failures (binding a port, accepting a connection).
#[derive(Debug)]
pub struct Error(Kind);

#[derive(Debug)]
enum Kind {
    Io(std::io::Error),
    Pattern { pattern: String, reason: &'static str },
    Route { pattern: String, source: matchit::InsertError },
}

impl Error {
    pub(crate) fn pattern(pattern: &str, reason: &'static str) -> Self {
        Self(Kind::Pattern { pattern: pattern.to_owned(), reason })
    }

    pub(crate) fn route(pattern: &str, source: matchit::InsertError) -> Self {
        Self(Kind::Route { pattern: pattern.to_owned(), source })
    }

    /// `true` when a route pattern was rejected at registration time.
    pub fn is_route(&self) -> bool {
        matches!(self.0, Kind::Pattern { .. } | Kind::Route { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Kind::Io(e) => write!(f, "io: {e}"),
            Kind::Pattern { pattern, reason } => write!(f, "invalid route `{pattern}`: {reason}"),
            Kind::Route { pattern, source } => write!(f, "invalid route `{pattern}`: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Kind::Io(e) => Some(e),
            Kind::Pattern { .. } => None,
            Kind::Route { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(Kind::Io(e))
    }
}
