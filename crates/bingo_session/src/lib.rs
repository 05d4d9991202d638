//! # Bingo Session - Server-Authoritative Board Reconciliation
//!
//! The session core of the bingo client. This crate consumes protocol events
//! from the transport layer, tracks the 5x5 board, and produces the outbound
//! reports the server expects - nothing more. Networking, rendering, and
//! process lifecycle live in the client crate.
//!
//! ## Design Philosophy
//!
//! The session core contains **no transport logic** - it only implements the
//! reconciliation semantics:
//!
//! * **Board tracking** - which cells have been acquired this session
//! * **Line detection** - pure evaluation of the 12 candidate bingo lines
//! * **Exactly-once reporting** - each completed line's location checks are
//!   sent to the server at most once, under duplicate and out-of-order
//!   delivery of the item stream
//! * **Win signalling** - the goal status update is sent exactly once
//!
//! Outbound traffic leaves through the [`CommandSink`] trait, which the
//! client crate implements over its WebSocket writer.
//!
//! ## Reconciliation Flow
//!
//! 1. The transport layer parses a server frame and hands each event to
//!    [`Reconciler::handle_event`]
//! 2. The reconciler updates bootstrap state (seed name, slot configuration,
//!    identifier map) or absorbs the item stream
//! 3. A reconciliation pass applies unseen grants to the board, recomputes
//!    completed lines, and diffs against previously reported lines
//! 4. Newly derived location checks are flushed as one batch; the goal
//!    status is sent when the required line count is first reached
//!
//! ## Concurrency
//!
//! All mutable session state lives behind a single `tokio::sync::Mutex`
//! owned by the reconciler. Every per-event algorithm runs as one critical
//! section under that lock, so overlapping item notifications cannot race on
//! board mutation or double-count a completed line. The lock is released on
//! every exit path, including error returns.
//!
//! ## Error Handling
//!
//! The session core uses structured error types ([`SessionError`]) and
//! treats nothing as fatal: ordering problems are recovered by deferral,
//! duplicates by the received-item ledger, unknown identifiers by skipping
//! the single report, and transport failures by the server's full resend on
//! reconnect.

pub use board::{completed_lines, BoardState, Line, LINE_COUNT};
pub use catalog::IdentifierMap;
pub use config::SessionConfig;
pub use error::SessionError;
pub use reconciler::{
    CommandSink, Reconciler, SessionPhase, ALL_BINGO_LOCATION, ITEMS_HANDLING_ALL,
};

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod reconciler;
