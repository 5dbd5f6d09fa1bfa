//! Domain Errors

use thiserror::Error;

/// Reasons a buffer could not be turned into a [Request](crate::Request).
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer split into zero lines. Splitting never yields an empty
    /// sequence, so this is kept as a distinct signal only.
    #[error("empty request")]
    EmptyRequest,

    /// The first line is not exactly `METHOD SP PATH SP VERSION`.
    #[error("malformed request line")]
    MalformedRequestLine,
}
