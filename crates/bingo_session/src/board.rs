//! Board state and the line-completion evaluator.
//!
//! The board is a fixed 5x5 grid of cells named `A1`..`E5`: rows are lettered
//! `A`-`E`, columns numbered `1`-`5`. Twelve lines can complete: five rows,
//! five columns, and the two diagonals. The layout is part of the game's wire
//! contract and is not configurable.

use std::collections::BTreeSet;

/// Row letters of the grid, top to bottom.
pub const ROW_LABELS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// Column digits of the grid, left to right.
pub const COLUMN_LABELS: [char; 5] = ['1', '2', '3', '4', '5'];

/// Number of candidate lines on the board: 5 rows + 5 columns + 2 diagonals.
pub const LINE_COUNT: usize = 12;

/// One of the twelve candidate bingo lines.
///
/// `Row(0)` is row A, `Column(0)` is column 1. The `Display` implementation
/// yields the label the server's location names are derived from, e.g.
/// `Bingo (A1-A5)` for row A and `Bingo (E1-A5)` for the anti-diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    /// A horizontal line; the index selects the row letter
    Row(usize),
    /// A vertical line; the index selects the column digit
    Column(usize),
    /// Top-left to bottom-right (A1, B2, C3, D4, E5)
    MainDiagonal,
    /// Bottom-left to top-right (E1, D2, C3, B4, A5)
    AntiDiagonal,
}

impl Line {
    /// Enumerates all twelve candidate lines in a stable order.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..5)
            .map(Line::Row)
            .chain((0..5).map(Line::Column))
            .chain([Line::MainDiagonal, Line::AntiDiagonal])
    }

    /// The five cell names making up this line.
    pub fn cells(&self) -> [String; 5] {
        let cell = |row: usize, col: usize| format!("{}{}", ROW_LABELS[row], COLUMN_LABELS[col]);
        match *self {
            Line::Row(row) => std::array::from_fn(|col| cell(row, col)),
            Line::Column(col) => std::array::from_fn(|row| cell(row, col)),
            Line::MainDiagonal => std::array::from_fn(|i| cell(i, i)),
            Line::AntiDiagonal => std::array::from_fn(|i| cell(4 - i, i)),
        }
    }

    /// The names of the two reportable locations this line derives.
    ///
    /// A completed line is worth two split rewards on the server side, so
    /// each line maps to a `-0` and a `-1` location.
    pub fn location_names(&self) -> [String; 2] {
        [format!("{self}-0"), format!("{self}-1")]
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Line::Row(row) => {
                let letter = ROW_LABELS[row];
                write!(f, "Bingo ({letter}1-{letter}5)")
            }
            Line::Column(col) => {
                let digit = COLUMN_LABELS[col];
                write!(f, "Bingo (A{digit}-E{digit})")
            }
            Line::MainDiagonal => write!(f, "Bingo (A1-E5)"),
            Line::AntiDiagonal => write!(f, "Bingo (E1-A5)"),
        }
    }
}

/// The set of board cells acquired this session.
///
/// Grows monotonically: items are never revoked, so cells are only ever
/// inserted. The reconciler is the sole mutator, under its critical section.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    cells: BTreeSet<String>,
}

impl BoardState {
    /// Creates an empty board for a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a cell as acquired. Returns `false` if it was already present.
    pub fn insert(&mut self, cell: impl Into<String>) -> bool {
        self.cells.insert(cell.into())
    }

    /// Whether the named cell has been acquired.
    pub fn contains(&self, cell: &str) -> bool {
        self.cells.contains(cell)
    }

    /// Number of acquired cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells have been acquired yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the acquired cell names in sorted order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

/// Evaluates which lines are complete on the given board.
///
/// A line is complete iff all five of its cells are present. Pure and
/// deterministic: repeated calls with an unchanged board yield an identical
/// set, which the reconciler relies on to diff against prior passes.
pub fn completed_lines(board: &BoardState) -> BTreeSet<Line> {
    Line::all()
        .filter(|line| line.cells().iter().all(|cell| board.contains(cell)))
        .collect()
}
