//! # Core Protocol Identifiers
//!
//! Fundamental identifier types shared by the event and command definitions.
//!
//! ## Key Types
//!
//! - [`ItemId`] - protocol identifier for a grantable item (a board cell's backing item)
//! - [`LocationId`] - protocol identifier for a reportable location check
//! - [`ClientStatus`] - the coarse client lifecycle status reported to the server
//! - [`SessionId`] - process-local identity for one connection session
//!
//! ## Design Principles
//!
//! - **Type Safety**: wrapper types prevent id confusion (ItemId vs LocationId)
//! - **Wire Fidelity**: ids serialize as bare integers, status as its numeric code

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Protocol identifier for an item.
///
/// Items are what the server grants; for this game every relevant item backs
/// exactly one board cell. The id space is shared across all games on the
/// server, so an id is only meaningful relative to a data package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Protocol identifier for a location check.
///
/// Locations are what the client reports back; each completed bingo line
/// derives two of them, and the full board derives one more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client lifecycle status codes understood by the server.
///
/// Serialized as the protocol's numeric codes. Only `Goaled` is ever sent by
/// this client, and at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ClientStatus {
    /// No status reported yet
    Unknown,
    /// Connected and ready to play
    Ready,
    /// Actively playing
    Playing,
    /// The win condition has been reached
    Goaled,
}

impl From<ClientStatus> for u8 {
    fn from(status: ClientStatus) -> u8 {
        match status {
            ClientStatus::Unknown => 0,
            ClientStatus::Ready => 10,
            ClientStatus::Playing => 20,
            ClientStatus::Goaled => 30,
        }
    }
}

impl TryFrom<u8> for ClientStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ClientStatus::Unknown),
            10 => Ok(ClientStatus::Ready),
            20 => Ok(ClientStatus::Playing),
            30 => Ok(ClientStatus::Goaled),
            other => Err(format!("unknown client status code: {other}")),
        }
    }
}

/// Process-local identifier for one connection session.
///
/// A fresh id is minted every time the client (re)connects; it never goes on
/// the wire and exists purely to correlate log lines across a session's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        let json = serde_json::to_string(&ClientStatus::Goaled).unwrap();
        assert_eq!(json, "30");
        let status: ClientStatus = serde_json::from_str("30").unwrap();
        assert_eq!(status, ClientStatus::Goaled);
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        assert!(serde_json::from_str::<ClientStatus>("42").is_err());
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&ItemId(7001)).unwrap(), "7001");
        assert_eq!(serde_json::to_string(&LocationId(-3)).unwrap(), "-3");
    }
}
