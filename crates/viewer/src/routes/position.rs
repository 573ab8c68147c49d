use axum::{extract::Path, Extension, Json};
use board_core::board::{parse_promotion, parse_square};
use serde::{Deserialize, Serialize};
use shakmaty::Role;

use crate::error::AppError;
use crate::session::{Command, Outcome, SessionHandle};
use crate::view::ViewSnapshot;

#[derive(Deserialize)]
pub struct SetPositionRequest {
    pub fen: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    /// q, r, b or n; queen when omitted
    pub promotion: Option<String>,
}

#[derive(Serialize)]
pub struct ActionResponse {
    pub accepted: bool,
    pub state: ViewSnapshot,
}

impl From<Outcome> for ActionResponse {
    fn from(outcome: Outcome) -> Self {
        Self {
            accepted: outcome.accepted,
            state: outcome.snapshot,
        }
    }
}

/// GET /api/state
pub async fn get_state(Extension(session): Extension<SessionHandle>) -> Json<ViewSnapshot> {
    Json(session.current())
}

/// PUT /api/position
/// Invalid FEN text is accepted as input and reported through the state.
pub async fn set_position(
    Extension(session): Extension<SessionHandle>,
    Json(req): Json<SetPositionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let outcome = session.send(Command::SetFen(req.fen)).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/squares/{square}/click
pub async fn click_square(
    Extension(session): Extension<SessionHandle>,
    Path(square): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let square = parse_square(&square)?;
    let outcome = session.send(Command::ClickSquare(square)).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/moves
/// Drag-and-drop entry. `accepted: false` tells the board to snap the piece back.
pub async fn drop_piece(
    Extension(session): Extension<SessionHandle>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let from = parse_square(&req.from)?;
    let to = parse_square(&req.to)?;
    let promotion = match req.promotion.as_deref() {
        Some(letter) => parse_promotion(letter)?,
        None => Role::Queen,
    };

    let outcome = session
        .send(Command::DropPiece {
            from,
            to,
            promotion,
        })
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/history/{index}
pub async fn navigate(
    Extension(session): Extension<SessionHandle>,
    Path(index): Path<usize>,
) -> Result<Json<ActionResponse>, AppError> {
    let outcome = session.send(Command::Navigate(index)).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/analyze
/// `accepted: false` when the position is invalid or a request is in flight.
pub async fn analyze(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    let outcome = session.send(Command::Analyze).await?;
    Ok(Json(outcome.into()))
}

/// GET /api/pgn
pub async fn get_pgn(Extension(session): Extension<SessionHandle>) -> String {
    session.current().movetext
}
