//! # Bingo Protocol
//!
//! Wire-level types for the multiworld item-synchronization protocol as seen
//! by the bingo client. The server speaks JSON text frames, each frame
//! carrying an array of command objects tagged by a `cmd` field.
//!
//! ## Message Categories
//!
//! ### Server Events
//! Messages delivered by the server and consumed by the session core:
//! - `RoomInfo` - session identity (seed name), sent on connect
//! - `Connected` - handshake acceptance with slot data and location universe
//! - `DataPackage` - the name/id dictionary bootstrap payload
//! - `ReceivedItems` - the (full-resend) item-grant stream
//!
//! ### Client Commands
//! Messages produced by the client and sent by the transport layer:
//! - `Connect` - the auth handshake
//! - `GetDataPackage` / `Sync` - bootstrap and resync requests
//! - `LocationChecks` - batched location-check reports
//! - `StatusUpdate` - the one-shot goal signal
//!
//! ## Design Principles
//!
//! - **Type Safety**: Numeric identifiers are wrapped so item and location
//!   ids cannot be confused
//! - **Forward Compatibility**: unknown server commands are skipped during
//!   parsing rather than failing the whole frame
//! - **Serialization**: every type round-trips through serde_json in the
//!   exact shape the server expects

pub mod events;
pub mod types;

pub use events::{
    parse_server_events, ClientCommand, ConnectVersion, DataPackagePayload, GameData, ItemGrant,
    ServerEvent,
};
pub use types::{ClientStatus, ItemId, LocationId, SessionId};

/// Game identifier used in the data-package request and connect handshake.
pub const GAME_NAME: &str = "APBingo";
