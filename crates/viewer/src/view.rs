//! Serializable snapshot of everything the board page renders.

use board_core::analysis::AnalysisResult;
use board_core::history::MoveRecord;
use serde::Serialize;

use crate::controller::PositionController;

pub const IDLE_HINT: &str = "Position will be analyzed automatically after each move.";

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub fen: String,
    pub is_valid: bool,
    pub turn: char,
    pub is_loading: bool,
    pub error: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub panel: AnalysisPanel,
    pub selected: Option<String>,
    pub highlights: Highlights,
    pub pieces: Vec<PieceView>,
    pub history: Vec<MoveRow>,
    pub movetext: String,
    pub generation: u64,
}

/// What the analysis panel shows. Error wins over loading, loading over an
/// empty panel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisPanel {
    Error {
        message: String,
    },
    Loading,
    Idle {
        hint: &'static str,
    },
    Result {
        evaluation: String,
        value: String,
        bar: f64,
        depth: u32,
        best_move: String,
        pv: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Highlights {
    pub selected: Option<String>,
    pub destinations: Vec<String>,
    pub check: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieceView {
    pub square: String,
    pub piece: char,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveRow {
    pub number: usize,
    pub white: MoveView,
    pub black: Option<MoveView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveView {
    pub index: usize,
    pub san: String,
    pub color: char,
    pub fen: String,
    pub is_current: bool,
}

impl ViewSnapshot {
    pub fn from_controller(ctrl: &PositionController) -> Self {
        let position = ctrl.position();
        let board = ctrl.board();
        let selected = ctrl.selection().square();

        let panel = if let Some(err) = ctrl.error() {
            AnalysisPanel::Error {
                message: err.to_string(),
            }
        } else if ctrl.is_loading() {
            AnalysisPanel::Loading
        } else if let Some(result) = ctrl.analysis() {
            AnalysisPanel::Result {
                evaluation: result.evaluation_text(),
                value: result.signed_value(),
                bar: result.bar_percentage(),
                depth: result.search_depth,
                best_move: result.best_move.clone(),
                pv: result.principal_variation.clone(),
            }
        } else {
            AnalysisPanel::Idle { hint: IDLE_HINT }
        };

        let highlights = Highlights {
            selected: selected.map(|sq| sq.to_string()),
            destinations: selected
                .map(|sq| {
                    ctrl.legal_destinations(sq)
                        .into_iter()
                        .map(|dest| dest.to_string())
                        .collect()
                })
                .unwrap_or_default(),
            check: ctrl.checked_king_square().map(|sq| sq.to_string()),
        };

        let move_view = |(index, record): (usize, &MoveRecord)| MoveView {
            index,
            san: record.san.clone(),
            color: record.color.char(),
            fen: record.fen.clone(),
            is_current: record.fen == position.fen.trim(),
        };

        let history = ctrl
            .history()
            .paired()
            .into_iter()
            .map(|pair| MoveRow {
                number: pair.number,
                white: move_view(pair.white),
                black: pair.black.map(move_view),
            })
            .collect();

        Self {
            fen: position.fen.clone(),
            is_valid: position.is_valid,
            turn: board.turn().char(),
            is_loading: ctrl.is_loading(),
            error: ctrl.error().map(|e| e.to_string()),
            analysis: ctrl.analysis().cloned(),
            panel,
            selected: selected.map(|sq| sq.to_string()),
            highlights,
            pieces: board
                .pieces()
                .into_iter()
                .map(|(sq, piece)| PieceView {
                    square: sq.to_string(),
                    piece: piece.char(),
                })
                .collect(),
            history,
            movetext: ctrl.history().movetext(),
            generation: ctrl.generation(),
        }
    }
}
