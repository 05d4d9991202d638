//! The reconciler: the session's core state machine.
//!
//! Consumes server events one at a time, applies item grants to the board,
//! detects newly completed lines, derives and flushes location-check reports,
//! and raises the win signal. Every per-event algorithm runs as a single
//! critical section under one mutex so overlapping notifications from the
//! transport layer cannot race on board mutation or double-report a line.

use crate::board::{completed_lines, BoardState, Line, LINE_COUNT};
use crate::catalog::IdentifierMap;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::ledger::ReceivedLedger;
use async_trait::async_trait;
use bingo_protocol::{
    ClientCommand, ClientStatus, DataPackagePayload, ItemGrant, LocationId, ServerEvent, SessionId,
    GAME_NAME,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Name of the bonus location marked when all twelve lines are complete.
///
/// Independent bookkeeping from the victory status signal: it fires even when
/// the required line count is smaller than twelve.
pub const ALL_BINGO_LOCATION: &str = "Bingo (ALL)";

/// Item-handling bitmask requested in the connect handshake: items from other
/// worlds, starting inventory, and the slot's own items.
pub const ITEMS_HANDLING_ALL: u8 = 0b111;

/// Outbound seam between the session core and the transport layer.
///
/// The core produces protocol commands; the transport owns the socket. A
/// `send` that returns `Ok` means the transport's send call completed, not
/// merely that the command was queued - the reconciler's goal transition is
/// committed on that basis. Implementations must not call back into the
/// reconciler from `send`.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Sends a batch of commands as one frame.
    async fn send(&self, commands: Vec<ClientCommand>) -> Result<(), SessionError>;
}

/// Lifecycle phase of a session.
///
/// `Idle` has no representation here: a reconciler exists only while a
/// session does. One is constructed per connection and dropped on disconnect,
/// so reconnecting starts over from `AwaitingBootstrap` with fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Connected, but the identifier map has not been built yet
    #[default]
    AwaitingBootstrap,
    /// Normal operation: grants are applied and lines reported
    Active,
    /// Victory has been reported; line reporting continues, the win signal does not repeat
    Goaled,
}

/// All mutable session state, owned by the reconciler's mutex.
#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    /// Seed name from `RoomInfo`; bootstrap is incomplete without it
    seed_name: Option<String>,
    config: Option<SessionConfig>,
    /// Location ids relevant to this session, from the `Connected` handshake
    location_universe: HashSet<LocationId>,
    /// Built once per session, after the universe is known
    catalog: Option<Arc<IdentifierMap>>,
    board: BoardState,
    ledger: ReceivedLedger,
    /// Latest full item stream from the server, reconciled on every pass
    item_stream: Vec<ItemGrant>,
    /// Lines whose locations have already been derived and enqueued
    reported_lines: BTreeSet<Line>,
    /// Locations confirmed sent (including checks from earlier sessions)
    confirmed: HashSet<LocationId>,
    /// Outbound report queue: computed but not yet flushed
    pending: Vec<LocationId>,
    all_bingo_marked: bool,
}

/// The session-state reconciler.
///
/// Owns all board/ledger/report state exclusively; the transport layer only
/// ever interacts through [`Reconciler::handle_event`] and the read-only
/// accessors. See the crate docs for the reconciliation flow.
pub struct Reconciler {
    session_id: SessionId,
    sink: Arc<dyn CommandSink>,
    state: Mutex<SessionState>,
}

impl Reconciler {
    /// Creates a reconciler for a fresh session, sending through `sink`.
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        let session_id = SessionId::new();
        debug!(session = %session_id, "reconciler created");
        Self {
            session_id,
            sink,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// This session's process-local identity, for log correlation.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Dispatches one server event into the session.
    ///
    /// Each call runs as one critical section; concurrent calls serialize on
    /// the state mutex and block only their own task.
    pub async fn handle_event(&self, event: ServerEvent) -> Result<(), SessionError> {
        match event {
            ServerEvent::RoomInfo { seed_name } => self.handle_room_info(seed_name).await,
            ServerEvent::Connected {
                missing_locations,
                checked_locations,
                slot_data,
            } => {
                self.handle_connected(missing_locations, checked_locations, slot_data)
                    .await
            }
            ServerEvent::DataPackage { data } => self.handle_data_package(data).await,
            ServerEvent::ReceivedItems { index, items } => {
                self.handle_received_items(index, items).await
            }
        }
    }

    /// Processes the `Connected` handshake acceptance.
    ///
    /// Establishes the location universe and session configuration, then
    /// requests the data package - a `DataPackage` that arrived before
    /// `Connected` was ignored, and this request replaces it.
    async fn handle_connected(
        &self,
        missing_locations: Vec<LocationId>,
        checked_locations: Vec<LocationId>,
        slot_data: serde_json::Value,
    ) -> Result<(), SessionError> {
        let mut st = self.state.lock().await;
        st.location_universe = missing_locations
            .iter()
            .chain(checked_locations.iter())
            .copied()
            .collect();
        // Checks reported in an earlier session count as already sent.
        st.confirmed.extend(checked_locations.iter().copied());
        let config = SessionConfig::from_slot_data(&slot_data)?;
        info!(
            session = %self.session_id,
            locations = st.location_universe.len(),
            required = config.required_line_count,
            "connected to slot"
        );
        st.config = Some(config);
        Self::try_activate(&mut st, self.session_id);

        self.sink
            .send(vec![ClientCommand::GetDataPackage {
                games: vec![GAME_NAME.to_string()],
            }])
            .await
    }

    /// Records the session identity from `RoomInfo`.
    ///
    /// The seed name can be the last bootstrap prerequisite to arrive, so a
    /// reconciliation pass runs afterwards to replay any held-back grants.
    async fn handle_room_info(&self, seed_name: String) -> Result<(), SessionError> {
        let mut st = self.state.lock().await;
        debug!(session = %self.session_id, seed = %seed_name, "room info received");
        st.seed_name = Some(seed_name);
        Self::try_activate(&mut st, self.session_id);
        self.reconcile_locked(&mut st).await
    }

    /// Builds the identifier map from the data package, then reconciles any
    /// item grants that were held back waiting for it.
    async fn handle_data_package(&self, data: DataPackagePayload) -> Result<(), SessionError> {
        let mut st = self.state.lock().await;
        if st.location_universe.is_empty() {
            // Connected has not been processed; the package will be
            // re-requested once it is.
            debug!(session = %self.session_id, "data package before handshake; ignoring");
            return Ok(());
        }
        if st.catalog.is_some() {
            debug!(session = %self.session_id, "identifier map already built; ignoring repeat data package");
            return Ok(());
        }
        let Some(game) = data.games.get(GAME_NAME) else {
            warn!(session = %self.session_id, "data package carries no {GAME_NAME} entry");
            return Ok(());
        };
        st.catalog = Some(Arc::new(IdentifierMap::build(&st.location_universe, game)));
        Self::try_activate(&mut st, self.session_id);

        // The server resends the full item list around bootstrap; whatever
        // has already arrived is reconciled now.
        self.reconcile_locked(&mut st).await
    }

    /// Absorbs an item-grant delivery and reconciles.
    ///
    /// `index == 0` is a full resend and replaces the stream; a delta must
    /// line up with the stream's tail, otherwise a full resync is requested.
    async fn handle_received_items(
        &self,
        index: usize,
        items: Vec<ItemGrant>,
    ) -> Result<(), SessionError> {
        let mut st = self.state.lock().await;
        if index == 0 {
            st.item_stream = items;
        } else if index == st.item_stream.len() {
            st.item_stream.extend(items);
        } else {
            warn!(
                session = %self.session_id,
                expected = st.item_stream.len(),
                index,
                "item stream out of sequence; requesting full resync"
            );
            return self.sink.send(vec![ClientCommand::Sync]).await;
        }
        self.reconcile_locked(&mut st).await
    }

    /// Runs one reconciliation pass over the current item stream.
    ///
    /// Callable at any time: with nothing new to apply it converges to a
    /// no-op. Public so the transport layer can drive a pass without a new
    /// event (e.g. after a reconnect handshake).
    pub async fn reconcile(&self) -> Result<(), SessionError> {
        let mut st = self.state.lock().await;
        self.reconcile_locked(&mut st).await
    }

    /// The per-event reconciliation algorithm. Runs under the state mutex
    /// held by the caller; the guard is released on every exit path including
    /// the error returns, and the sink cannot re-enter the reconciler.
    async fn reconcile_locked(&self, st: &mut SessionState) -> Result<(), SessionError> {
        // Until bootstrap completes names cannot be resolved; the stream is
        // kept and this pass re-runs once the last prerequisite lands.
        if st.phase == SessionPhase::AwaitingBootstrap {
            trace!(session = %self.session_id, "reconciliation deferred until bootstrap");
            return Ok(());
        }
        let Some(catalog) = st.catalog.clone() else {
            trace!(session = %self.session_id, "reconciliation deferred until the identifier map");
            return Ok(());
        };
        let Some(required) = st.config.as_ref().map(|c| c.required_line_count) else {
            trace!(session = %self.session_id, "reconciliation deferred until slot config");
            return Ok(());
        };

        // Step 1: apply grants not yet in the ledger.
        let unseen: Vec<ItemGrant> = st
            .item_stream
            .iter()
            .filter(|grant| !st.ledger.contains(grant))
            .copied()
            .collect();
        for grant in unseen {
            st.ledger.record(grant);
            match catalog.item_name(grant.item) {
                Some(cell) => {
                    if st.board.insert(cell) {
                        debug!(session = %self.session_id, cell, "board cell acquired");
                    }
                }
                None => trace!(
                    session = %self.session_id,
                    item = %grant.item,
                    "grant does not back a board cell"
                ),
            }
        }

        // Step 2: recompute the completed-line set.
        let completed = completed_lines(&st.board);

        // Step 3: victory. The transition commits only once the status update
        // has been accepted by the transport send completing; afterwards the
        // Goaled phase alone guards against re-sending.
        if st.phase != SessionPhase::Goaled && completed.len() >= required {
            self.sink
                .send(vec![ClientCommand::StatusUpdate {
                    status: ClientStatus::Goaled,
                }])
                .await?;
            st.phase = SessionPhase::Goaled;
            info!(
                session = %self.session_id,
                lines = completed.len(),
                required,
                "goal reached; status update sent"
            );
        }

        // Step 4: the all-bingo bonus, once, on the first pass where the full
        // set reaches twelve. Separate bookkeeping from the win condition.
        if !st.all_bingo_marked && completed.len() == LINE_COUNT {
            st.all_bingo_marked = true;
            match catalog.location_id(ALL_BINGO_LOCATION) {
                Some(id) if !st.confirmed.contains(&id) && !st.pending.contains(&id) => {
                    info!(session = %self.session_id, "all twelve lines complete");
                    st.pending.push(id);
                }
                Some(_) => {}
                None => trace!(
                    session = %self.session_id,
                    "all-bingo location not in this session's map"
                ),
            }
        }

        // Step 5: derive the two locations of each newly completed line. A
        // name missing from the filtered map belongs to a different session's
        // data and is skipped without complaint.
        for line in completed.iter().copied() {
            if !st.reported_lines.insert(line) {
                continue;
            }
            info!(session = %self.session_id, line = %line, "bingo completed");
            for name in line.location_names() {
                match catalog.location_id(&name) {
                    Some(id) if !st.confirmed.contains(&id) && !st.pending.contains(&id) => {
                        st.pending.push(id);
                    }
                    Some(_) => {}
                    None => trace!(
                        session = %self.session_id,
                        location = %name,
                        "location not in this session's map"
                    ),
                }
            }
        }

        // Step 6: flush the queue as one batch. An empty queue skips the send
        // entirely. On failure the queue is left pending: state is never
        // rolled back, and the next pass retries the flush.
        if st.pending.is_empty() {
            return Ok(());
        }
        let batch = st.pending.clone();
        self.sink
            .send(vec![ClientCommand::LocationChecks {
                locations: batch.clone(),
            }])
            .await?;
        st.confirmed.extend(batch.iter().copied());
        st.pending.clear();
        debug!(
            session = %self.session_id,
            count = batch.len(),
            "location checks confirmed"
        );
        Ok(())
    }

    /// Leaves `AwaitingBootstrap` once the handshake, the seed name, and the
    /// identifier map have all been processed.
    fn try_activate(st: &mut SessionState, session_id: SessionId) {
        if st.phase == SessionPhase::AwaitingBootstrap
            && st.seed_name.is_some()
            && st.config.is_some()
            && st.catalog.is_some()
        {
            st.phase = SessionPhase::Active;
            info!(session = %session_id, "session active");
        }
    }

    /// Read-only diagnostic: how many bingos this session requires.
    pub async fn bingo_info(&self) -> String {
        let st = self.state.lock().await;
        match &st.config {
            Some(config) => format!("{} bingos required", config.required_line_count),
            None => "bingo requirement not yet known".to_string(),
        }
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    /// Snapshot of the acquired cell names.
    pub async fn acquired_cells(&self) -> BTreeSet<String> {
        self.state
            .lock()
            .await
            .board
            .cells()
            .map(str::to_string)
            .collect()
    }

    /// Number of distinct item grants applied so far.
    pub async fn applied_grant_count(&self) -> usize {
        self.state.lock().await.ledger.len()
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("session_id", &self.session_id)
            .finish()
    }
}
