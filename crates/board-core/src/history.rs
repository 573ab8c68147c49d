//! Append-only move history.
//!
//! Records are never removed. Navigating to an earlier record and playing on
//! appends to the same flat list, so the chain of `fen`s is not guaranteed to
//! be a single line of play.

use std::fmt::Write;

use shakmaty::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// SAN including the check/mate suffix
    pub san: String,
    /// Side that made the move
    pub color: Color,
    /// Position after the move
    pub fen: String,
}

/// One numbered row of the history: the move at an even index and the one
/// after it.
#[derive(Debug, Clone, Copy)]
pub struct MovePair<'a> {
    pub number: usize,
    pub white: (usize, &'a MoveRecord),
    pub black: Option<(usize, &'a MoveRecord)>,
}

#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index.
    pub fn push(&mut self, record: MoveRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&MoveRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Group records into rows of two by position in the list, the way the
    /// move list is displayed.
    pub fn paired(&self) -> Vec<MovePair<'_>> {
        self.records
            .chunks(2)
            .enumerate()
            .map(|(row, chunk)| MovePair {
                number: row + 1,
                white: (row * 2, &chunk[0]),
                black: chunk.get(1).map(|record| (row * 2 + 1, record)),
            })
            .collect()
    }

    /// Movetext such as `1. e4 e5 2. Nf3`. Move numbers come from the
    /// fullmove counter of each resulting position.
    pub fn movetext(&self) -> String {
        let mut out = String::new();
        let mut after_white = false;

        for record in &self.records {
            if !out.is_empty() {
                out.push(' ');
            }
            let fullmove = fullmove_number(&record.fen);
            match record.color {
                Color::White => {
                    let _ = write!(out, "{}. {}", fullmove, record.san);
                    after_white = true;
                }
                Color::Black => {
                    if !after_white {
                        let _ = write!(out, "{}... ", fullmove.saturating_sub(1).max(1));
                    }
                    out.push_str(&record.san);
                    after_white = false;
                }
            }
        }

        out
    }
}

/// Sixth FEN field; 1 when missing or malformed.
fn fullmove_number(fen: &str) -> u32 {
    fen.split_whitespace()
        .nth(5)
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}
