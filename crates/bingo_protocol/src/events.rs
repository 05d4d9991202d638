//! # Protocol Events and Commands
//!
//! Definitions for the JSON messages exchanged with the multiworld server,
//! plus the frame parser used by the transport layer.
//!
//! Every frame on the wire is a JSON array of command objects, each tagged by
//! a `cmd` field. The server emits many command kinds this client has no use
//! for (chat echoes, bounces, hint updates); [`parse_server_events`] keeps
//! the ones the session core consumes and skips the rest, so a frame is never
//! rejected just because it carries an unknown command.

use crate::types::{ClientStatus, ItemId, LocationId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{trace, warn};

/// A single item grant delivered in the `ReceivedItems` stream.
///
/// The tuple of fields is the grant's identity: the server resends the full
/// list on every sync, and a grant with the same item, source location,
/// sending player and flags is the same grant. The session ledger relies on
/// this equality for idempotent reapplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemGrant {
    /// The granted item
    pub item: ItemId,
    /// The location in the sending world that produced the item
    pub location: LocationId,
    /// Slot number of the sending player
    pub player: i32,
    /// Item classification flags (progression/useful/trap)
    #[serde(default)]
    pub flags: i32,
}

/// Per-game name/id dictionaries from the data package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    /// Item name to protocol id, for every item the game defines
    #[serde(default)]
    pub item_name_to_id: HashMap<String, ItemId>,
    /// Location name to protocol id, for every location the game defines
    #[serde(default)]
    pub location_name_to_id: HashMap<String, LocationId>,
}

/// The data-package bootstrap payload: dictionaries keyed by game name.
///
/// The payload may describe a superset of games shared across unrelated
/// sessions; consumers pick their own game's entry and filter it further.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPackagePayload {
    /// Name/id dictionaries per game
    #[serde(default)]
    pub games: HashMap<String, GameData>,
}

/// Server-to-client events consumed by the session core.
///
/// This is deliberately the narrow subset of the protocol the reconciler
/// needs; everything else the server sends is dropped during frame parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum ServerEvent {
    /// Session identity, sent immediately after the socket opens.
    RoomInfo {
        /// Seed name identifying the generated multiworld
        seed_name: String,
    },
    /// Handshake acceptance: the slot's location universe and options.
    Connected {
        /// Locations of this slot not yet checked
        #[serde(default)]
        missing_locations: Vec<LocationId>,
        /// Locations of this slot already checked in an earlier session
        #[serde(default)]
        checked_locations: Vec<LocationId>,
        /// Game-specific options blob (required line count, board layout)
        #[serde(default)]
        slot_data: serde_json::Value,
    },
    /// The name/id dictionary bootstrap payload.
    DataPackage {
        /// Per-game dictionaries
        data: DataPackagePayload,
    },
    /// The item-grant stream. `index == 0` marks a full resend.
    ReceivedItems {
        /// Position of the first grant within the session's item sequence
        index: usize,
        /// The grants themselves, in sequence order
        items: Vec<ItemGrant>,
    },
}

/// Protocol version advertised in the connect handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    /// Wire-format discriminator required by the server's deserializer
    pub class: String,
}

impl Default for ConnectVersion {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 5,
            build: 0,
            class: "Version".to_string(),
        }
    }
}

/// Client-to-server commands produced by the session core and the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum ClientCommand {
    /// The auth handshake, sent in response to `RoomInfo`.
    Connect {
        /// Room password, if the server requires one
        password: Option<String>,
        /// Game this slot plays
        game: String,
        /// Slot (player) name
        name: String,
        /// Client instance identifier
        uuid: String,
        /// Protocol version spoken by this client
        version: ConnectVersion,
        /// Bitmask of item sources the client wants delivered
        items_handling: u8,
        /// Capability tags
        tags: Vec<String>,
    },
    /// Request the name/id dictionaries for the listed games.
    GetDataPackage {
        /// Games to include in the package
        games: Vec<String>,
    },
    /// Request a full resend of the item-grant stream.
    Sync,
    /// Batched report of newly completed location checks.
    LocationChecks {
        /// The checks to report
        locations: Vec<LocationId>,
    },
    /// One-shot client status report.
    StatusUpdate {
        /// The new status
        status: ClientStatus,
    },
}

/// Parses one text frame into the server events the session core consumes.
///
/// The frame must be a JSON array; each element is decoded independently so
/// that command kinds this client does not model are skipped with a trace
/// instead of failing the frame. A frame that is not valid JSON at all is
/// dropped with a warning and yields no events.
pub fn parse_server_events(text: &str) -> Vec<ServerEvent> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(text) {
        Ok(values) => values,
        Err(e) => {
            warn!("Discarding malformed server frame: {e}");
            return Vec::new();
        }
    };

    let mut events = Vec::with_capacity(values.len());
    for value in values {
        let cmd = value
            .get("cmd")
            .and_then(|c| c.as_str())
            .unwrap_or("<untagged>")
            .to_string();
        match serde_json::from_value::<ServerEvent>(value) {
            Ok(event) => events.push(event),
            Err(_) => trace!("Skipping unhandled server command '{cmd}'"),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connected_frame() {
        let frame = r#"[{
            "cmd": "Connected",
            "team": 0, "slot": 1,
            "missing_locations": [101, 102],
            "checked_locations": [100],
            "slot_data": {"requiredBingoCount": 3}
        }]"#;
        let events = parse_server_events(frame);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::Connected {
                missing_locations,
                checked_locations,
                slot_data,
            } => {
                assert_eq!(missing_locations, &[LocationId(101), LocationId(102)]);
                assert_eq!(checked_locations, &[LocationId(100)]);
                assert_eq!(slot_data["requiredBingoCount"], 3);
            }
            other => panic!("expected Connected, got {other:?}"),
        }
    }

    #[test]
    fn parses_received_items_and_skips_unknown_commands() {
        let frame = r#"[
            {"cmd": "PrintJSON", "data": [{"text": "hello"}]},
            {"cmd": "ReceivedItems", "index": 0, "items": [
                {"item": 7001, "location": 9001, "player": 1, "flags": 0}
            ]}
        ]"#;
        let events = parse_server_events(frame);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::ReceivedItems { index, items } => {
                assert_eq!(*index, 0);
                assert_eq!(
                    items[0],
                    ItemGrant {
                        item: ItemId(7001),
                        location: LocationId(9001),
                        player: 1,
                        flags: 0,
                    }
                );
            }
            other => panic!("expected ReceivedItems, got {other:?}"),
        }
    }

    #[test]
    fn malformed_frame_yields_no_events() {
        assert!(parse_server_events("not json").is_empty());
    }

    #[test]
    fn location_checks_serializes_with_cmd_tag() {
        let cmd = ClientCommand::LocationChecks {
            locations: vec![LocationId(5), LocationId(6)],
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["cmd"], "LocationChecks");
        assert_eq!(json["locations"], serde_json::json!([5, 6]));
    }

    #[test]
    fn status_update_carries_numeric_code() {
        let cmd = ClientCommand::StatusUpdate {
            status: ClientStatus::Goaled,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["status"], 30);
    }
}
