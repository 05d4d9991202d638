//! Session configuration taken from the connect handshake.
//!
//! The server's `Connected` message carries a game-specific `slot_data` blob
//! holding the two session options the core needs: the number of completed
//! lines required to win, and the board's cell-name layout. Both are fixed
//! for the session's lifetime.

use crate::board::{COLUMN_LABELS, ROW_LABELS};
use crate::error::SessionError;
use tracing::debug;

/// Immutable per-session options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Completed lines needed to trigger victory (1..=12)
    pub required_line_count: usize,
    /// The 25 cell names in board order, as laid out by the generator
    pub board_cells: Vec<String>,
}

impl SessionConfig {
    /// Parses session options out of the `Connected` slot data.
    ///
    /// `requiredBingoCount` is required; the generator has emitted it both as
    /// a number and as a numeric string, so both forms are accepted.
    /// `boardLocations` describes the rendered board layout; when absent the
    /// canonical `A1`..`E5` grid is assumed.
    pub fn from_slot_data(slot_data: &serde_json::Value) -> Result<Self, SessionError> {
        let required = slot_data
            .get("requiredBingoCount")
            .ok_or_else(|| SessionError::Internal("slot data missing requiredBingoCount".into()))?;
        let required_line_count = match required {
            serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
            serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            SessionError::Internal(format!("unparseable requiredBingoCount: {required}"))
        })?;

        let board_cells = match slot_data.get("boardLocations") {
            Some(serde_json::Value::Array(cells)) => cells
                .iter()
                .map(|cell| {
                    cell.as_str().map(str::to_string).ok_or_else(|| {
                        SessionError::Internal(format!("non-string board cell: {cell}"))
                    })
                })
                .collect::<Result<Vec<String>, SessionError>>()?,
            Some(other) => {
                return Err(SessionError::Internal(format!(
                    "unparseable boardLocations: {other}"
                )))
            }
            None => {
                debug!("slot data carries no boardLocations; assuming the canonical grid");
                Self::canonical_layout()
            }
        };

        Ok(Self {
            required_line_count,
            board_cells,
        })
    }

    /// The canonical `A1`..`E5` cell layout in row-major order.
    pub fn canonical_layout() -> Vec<String> {
        ROW_LABELS
            .iter()
            .flat_map(|row| COLUMN_LABELS.iter().map(move |col| format!("{row}{col}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_required_count() {
        let slot_data = serde_json::json!({ "requiredBingoCount": 3 });
        let config = SessionConfig::from_slot_data(&slot_data).unwrap();
        assert_eq!(config.required_line_count, 3);
        assert_eq!(config.board_cells.len(), 25);
    }

    #[test]
    fn parses_stringly_required_count() {
        let slot_data = serde_json::json!({ "requiredBingoCount": "12" });
        let config = SessionConfig::from_slot_data(&slot_data).unwrap();
        assert_eq!(config.required_line_count, 12);
    }

    #[test]
    fn missing_required_count_is_an_error() {
        let slot_data = serde_json::json!({ "boardLocations": [] });
        assert!(SessionConfig::from_slot_data(&slot_data).is_err());
    }

    #[test]
    fn explicit_board_layout_is_kept() {
        let slot_data = serde_json::json!({
            "requiredBingoCount": 1,
            "boardLocations": ["A1", "B2"]
        });
        let config = SessionConfig::from_slot_data(&slot_data).unwrap();
        assert_eq!(config.board_cells, vec!["A1", "B2"]);
    }

    #[test]
    fn canonical_layout_is_row_major() {
        let layout = SessionConfig::canonical_layout();
        assert_eq!(layout.len(), 25);
        assert_eq!(layout[0], "A1");
        assert_eq!(layout[4], "A5");
        assert_eq!(layout[24], "E5");
    }
}
