//! Position controller.
//!
//! Owns the board, the move history, the click selection and the analysis
//! display state, and reconciles FEN text edits, board interaction and
//! history navigation into one current position. It performs no I/O: every
//! operation that should trigger an evaluation returns an [`AnalysisTicket`]
//! and the caller hands the response back through
//! [`PositionController::complete_analysis`].

use board_core::analysis::AnalysisResult;
use board_core::board::{BoardState, MoveOutcome, STARTING_FEN};
use board_core::error::BoardError;
use board_core::history::MoveHistory;
use board_core::selection::{ClickAction, Selection};
use shakmaty::{Role, Square};
use tracing::{debug, info, warn};

use crate::clients::analysis::{AnalysisError, DEFAULT_DEPTH};

/// The FEN currently shown and whether it loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub fen: String,
    pub is_valid: bool,
}

/// How responses that arrive after the position moved on are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPolicy {
    /// Whatever arrives last is displayed, even for a superseded position.
    LatestArrival,
    /// Responses issued for an earlier generation are dropped.
    #[default]
    DiscardStale,
}

impl AnalysisPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "latest-arrival" | "latest_arrival" | "latest" => Some(AnalysisPolicy::LatestArrival),
            "discard-stale" | "discard_stale" | "discard" => Some(AnalysisPolicy::DiscardStale),
            _ => None,
        }
    }
}

/// A request to evaluate `fen`, tagged with the generation it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub fen: String,
    pub depth: u32,
}

/// User-visible conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("Invalid FEN position")]
    InvalidRepresentation,

    #[error("Analysis failed. Please try again.")]
    AnalysisFailed,

    #[error("No move at index {0}")]
    UnknownMove(usize),
}

/// How a move was entered. Click entry always clears the selection, a
/// rejected drop leaves it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEntry {
    Click,
    Drag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAttempt {
    pub outcome: MoveOutcome,
    pub ticket: Option<AnalysisTicket>,
}

pub struct PositionController {
    board: BoardState,
    position: Position,
    history: MoveHistory,
    selection: Selection,
    analysis: Option<AnalysisResult>,
    error: Option<ControllerError>,
    /// Bumped on every change of `position`
    generation: u64,
    in_flight: usize,
    /// Outstanding requests issued for the current generation
    in_flight_current: usize,
    initial_fen: String,
    depth: u32,
    policy: AnalysisPolicy,
}

impl Default for PositionController {
    fn default() -> Self {
        Self::with_board(
            BoardState::default(),
            STARTING_FEN,
            DEFAULT_DEPTH,
            AnalysisPolicy::default(),
        )
    }
}

impl PositionController {
    /// Start from `start_fen`. The initial load never triggers an analysis.
    pub fn new(start_fen: &str, depth: u32, policy: AnalysisPolicy) -> Result<Self, BoardError> {
        let board = BoardState::from_fen(start_fen)?;
        Ok(Self::with_board(board, start_fen, depth, policy))
    }

    fn with_board(board: BoardState, start_fen: &str, depth: u32, policy: AnalysisPolicy) -> Self {
        Self {
            board,
            position: Position {
                fen: start_fen.to_string(),
                is_valid: true,
            },
            history: MoveHistory::new(),
            selection: Selection::Unselected,
            analysis: None,
            error: None,
            generation: 0,
            in_flight: 0,
            in_flight_current: 0,
            initial_fen: start_fen.to_string(),
            depth,
            policy,
        }
    }

    // ---- Inputs ----

    /// Free-text FEN edit. The text is kept as typed for display, while
    /// requests use it trimmed. On failure
    /// the board keeps its last valid position and the analysis is cleared.
    pub fn set_from_text(
        &mut self,
        raw: &str,
    ) -> Result<Option<AnalysisTicket>, ControllerError> {
        match self.board.load(raw) {
            Ok(()) => {
                self.error = None;
                self.selection = Selection::Unselected;
                Ok(self.commit(Position {
                    fen: raw.to_string(),
                    is_valid: true,
                }))
            }
            Err(e) => {
                debug!(error = %e, "Rejected FEN edit");
                self.error = Some(ControllerError::InvalidRepresentation);
                self.analysis = None;
                self.selection = Selection::Unselected;
                self.commit(Position {
                    fen: raw.to_string(),
                    is_valid: false,
                });
                Err(ControllerError::InvalidRepresentation)
            }
        }
    }

    /// Play `from -> to`. Rejected outright while the shown position is invalid.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Role,
        entry: MoveEntry,
    ) -> MoveAttempt {
        let outcome = if self.position.is_valid {
            self.board.apply_move(from, to, promotion)
        } else {
            MoveOutcome::Illegal
        };

        let ticket = match &outcome {
            MoveOutcome::Legal(record) => {
                info!(san = %record.san, fen = %record.fen, "Move played");
                self.selection = Selection::Unselected;
                let next = Position {
                    fen: record.fen.clone(),
                    is_valid: true,
                };
                self.history.push(record.clone());
                self.commit(next)
            }
            MoveOutcome::Illegal => {
                debug!(%from, %to, ?entry, "Illegal move rejected");
                if entry == MoveEntry::Click {
                    self.selection = Selection::Unselected;
                }
                None
            }
        };

        MoveAttempt { outcome, ticket }
    }

    /// Board click. Returns the move attempt when the click tried to move.
    pub fn select_square(&mut self, square: Square) -> Option<MoveAttempt> {
        if !self.position.is_valid {
            return None;
        }

        let own_piece = self.board.is_own_piece(square);
        match self.selection.on_click(square, own_piece) {
            ClickAction::Select(sq) => {
                self.selection = Selection::Selected(sq);
                None
            }
            ClickAction::Deselect => {
                self.selection = Selection::Unselected;
                None
            }
            ClickAction::Ignore => None,
            ClickAction::AttemptMove { from, to } => {
                Some(self.attempt_move(from, to, Role::Queen, MoveEntry::Click))
            }
        }
    }

    /// Show a previously recorded position. History is not modified; moves
    /// played from here are appended after the existing tail.
    pub fn navigate_to(&mut self, fen: &str) -> Result<Option<AnalysisTicket>, ControllerError> {
        self.board
            .load(fen)
            .map_err(|_| ControllerError::InvalidRepresentation)?;
        self.error = None;
        self.selection = Selection::Unselected;
        Ok(self.commit(Position {
            fen: fen.to_string(),
            is_valid: true,
        }))
    }

    pub fn navigate_to_move(
        &mut self,
        index: usize,
    ) -> Result<Option<AnalysisTicket>, ControllerError> {
        let fen = self
            .history
            .get(index)
            .map(|record| record.fen.clone())
            .ok_or(ControllerError::UnknownMove(index))?;
        self.navigate_to(&fen)
    }

    /// Manual analysis of the shown position. Refused while invalid or while
    /// another request is outstanding.
    pub fn request_analysis(&mut self) -> Option<AnalysisTicket> {
        if !self.position.is_valid || self.is_loading() {
            return None;
        }
        Some(self.issue_ticket())
    }

    /// Feed back the outcome of a ticket. Returns whether it was applied.
    pub fn complete_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        let stale = ticket.generation != self.generation;
        if !stale {
            self.in_flight_current = self.in_flight_current.saturating_sub(1);
        }
        if stale && self.policy == AnalysisPolicy::DiscardStale {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                fen = %ticket.fen,
                "Discarding stale analysis response"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                // Never show an evaluation next to a position that failed to load
                if !self.position.is_valid {
                    return false;
                }
                if stale {
                    warn!(fen = %ticket.fen, "Displaying analysis for a superseded position");
                }
                self.analysis = Some(result);
            }
            Err(e) => {
                warn!(fen = %ticket.fen, error = %e, "Analysis failed");
                self.error = Some(ControllerError::AnalysisFailed);
                self.analysis = None;
            }
        }
        true
    }

    // ---- Queries ----

    /// Destinations for highlighting. Empty while the position is invalid.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        if !self.position.is_valid {
            return Vec::new();
        }
        self.board.legal_destinations(square)
    }

    pub fn is_king_in_check(&self) -> bool {
        self.position.is_valid && self.board.is_check()
    }

    pub fn checked_king_square(&self) -> Option<Square> {
        if !self.position.is_valid {
            return None;
        }
        self.board.checked_king_square()
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn error(&self) -> Option<&ControllerError> {
        self.error.as_ref()
    }

    /// Under `DiscardStale` only a request for the shown position counts,
    /// since anything older will be dropped on arrival.
    pub fn is_loading(&self) -> bool {
        match self.policy {
            AnalysisPolicy::LatestArrival => self.in_flight > 0,
            AnalysisPolicy::DiscardStale => self.in_flight_current > 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> AnalysisPolicy {
        self.policy
    }

    // ---- Internals ----

    /// Install `next` as the shown position and decide whether it needs an
    /// evaluation: only on an actual change, only when valid, and never for
    /// the position the controller started from.
    fn commit(&mut self, next: Position) -> Option<AnalysisTicket> {
        if next == self.position {
            return None;
        }
        self.position = next;
        self.generation += 1;
        self.in_flight_current = 0;

        if !self.position.is_valid || self.position.fen.trim() == self.initial_fen {
            return None;
        }
        Some(self.issue_ticket())
    }

    fn issue_ticket(&mut self) -> AnalysisTicket {
        self.in_flight += 1;
        self.in_flight_current += 1;
        self.error = None;
        AnalysisTicket {
            generation: self.generation,
            fen: self.position.fen.trim().to_string(),
            depth: self.depth,
        }
    }
}
