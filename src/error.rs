//! Failure kinds for skill request handling.
//!
//! [`UpstreamError`] covers everything that can go wrong talking to the
//! geocoding and observation services; the intent router recovers from all
//! of it with a spoken retry prompt, as it does with [`MissingSlot`].
//! [`SkillError`] is what escapes a turn.

/// Failures reaching or interpreting an outbound collaborator.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection failure, timeout, or body read failure.
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx HTTP status.
    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    /// The collaborator answered but refused the query (e.g. REQUEST_DENIED).
    #[error("{service} rejected the request: {reason}")]
    Rejected {
        service: &'static str,
        reason: String,
    },

    /// The body did not match the expected shape.
    #[error("{service} response could not be parsed: {reason}")]
    Parse {
        service: &'static str,
        reason: String,
    },

    /// No geocoding candidate, or none in the requested state.
    #[error("no unambiguous location found for '{0}'")]
    AmbiguousOrNotFound(String),
}

/// A required slot was absent or blank; the router asks again.
#[derive(Debug, thiserror::Error)]
#[error("malformed request: missing '{0}' slot")]
pub struct MissingSlot(pub &'static str);

/// Errors that end a turn without a spoken response.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// The event's application id is not the configured one.
    #[error("invalid application id '{0}'")]
    InvalidApplication(String),

    /// An intent this skill does not handle.
    #[error("unrecognized intent '{0}'")]
    UnrecognizedIntent(String),

    /// A request type other than launch, intent, or session-ended.
    #[error("unsupported request type")]
    UnsupportedRequest,
}
