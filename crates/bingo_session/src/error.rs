//! Error types and handling for the session core.
//!
//! This module defines the error types that can occur during reconciliation,
//! providing clear categorization of different failure modes.

/// Enumeration of possible session errors.
///
/// Categorizes errors into transport-related and internal session errors.
/// Neither category is fatal to the process: transport errors surface to the
/// connection loop (which reconnects and relies on the server's full resend),
/// and internal errors indicate malformed handshake data for this session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-related errors such as a rejected send or a lost connection
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal session errors such as malformed slot data
    #[error("Internal error: {0}")]
    Internal(String),
}
