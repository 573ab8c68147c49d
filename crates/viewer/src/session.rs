//! Session task: the single owner of the controller.
//!
//! UI commands and analysis completions are both delivered as messages to one
//! tokio task, so the board is only ever touched from one place. Each analysis
//! request runs in its own spawned task and reports back over a channel; there
//! is no cancellation, a superseded request simply completes later.

use board_core::analysis::AnalysisResult;
use shakmaty::{Role, Square};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::clients::analysis::{AnalysisClient, AnalysisError};
use crate::controller::{AnalysisTicket, ControllerError, MoveEntry, PositionController};
use crate::view::ViewSnapshot;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug)]
pub enum Command {
    SetFen(String),
    ClickSquare(Square),
    DropPiece {
        from: Square,
        to: Square,
        promotion: Role,
    },
    Navigate(usize),
    Analyze,
}

/// Reply to a command: whether it took effect, and the state afterwards.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub accepted: bool,
    pub snapshot: ViewSnapshot,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session is no longer running")]
    Closed,

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

struct Envelope {
    command: Command,
    reply: oneshot::Sender<Result<Outcome, ControllerError>>,
}

struct Completion {
    ticket: AnalysisTicket,
    outcome: Result<AnalysisResult, AnalysisError>,
}

/// Cheap, cloneable handle used by the HTTP layer.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<ViewSnapshot>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<Outcome, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        let outcome = response.await.map_err(|_| SessionError::Closed)??;
        Ok(outcome)
    }

    /// Latest published state.
    pub fn current(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.clone()
    }
}

/// Start the session task. Must be called inside a tokio runtime.
pub fn spawn(controller: PositionController, client: AnalysisClient) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(ViewSnapshot::from_controller(&controller));

    tokio::spawn(run(controller, client, command_rx, snapshot_tx));

    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    }
}

async fn run(
    mut controller: PositionController,
    client: AnalysisClient,
    mut commands: mpsc::Receiver<Envelope>,
    snapshots: watch::Sender<ViewSnapshot>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

    info!(
        fen = %controller.position().fen,
        policy = ?controller.policy(),
        endpoint = client.endpoint(),
        "Session started"
    );

    loop {
        tokio::select! {
            envelope = commands.recv() => {
                let Some(Envelope { command, reply }) = envelope else {
                    break;
                };
                debug!(?command, "Command");

                let (result, ticket) = apply(&mut controller, command);
                if let Some(ticket) = ticket {
                    dispatch(&client, ticket, done_tx.clone());
                }

                let snapshot = ViewSnapshot::from_controller(&controller);
                snapshots.send_replace(snapshot.clone());
                let _ = reply.send(result.map(|accepted| Outcome { accepted, snapshot }));
            }
            Some(Completion { ticket, outcome }) = done_rx.recv() => {
                let applied = controller.complete_analysis(&ticket, outcome);
                debug!(generation = ticket.generation, applied, "Analysis completed");
                snapshots.send_replace(ViewSnapshot::from_controller(&controller));
            }
        }
    }

    info!("Session stopped");
}

fn apply(
    controller: &mut PositionController,
    command: Command,
) -> (Result<bool, ControllerError>, Option<AnalysisTicket>) {
    match command {
        Command::SetFen(fen) => match controller.set_from_text(&fen) {
            Ok(ticket) => (Ok(true), ticket),
            // Invalid text is state, not a failed request
            Err(_) => (Ok(false), None),
        },
        Command::ClickSquare(square) => match controller.select_square(square) {
            Some(attempt) => (Ok(attempt.outcome.is_legal()), attempt.ticket),
            None => (Ok(true), None),
        },
        Command::DropPiece {
            from,
            to,
            promotion,
        } => {
            let attempt = controller.attempt_move(from, to, promotion, MoveEntry::Drag);
            (Ok(attempt.outcome.is_legal()), attempt.ticket)
        }
        Command::Navigate(index) => match controller.navigate_to_move(index) {
            Ok(ticket) => (Ok(true), ticket),
            Err(e) => (Err(e), None),
        },
        Command::Analyze => {
            let ticket = controller.request_analysis();
            (Ok(ticket.is_some()), ticket)
        }
    }
}

fn dispatch(client: &AnalysisClient, ticket: AnalysisTicket, done: mpsc::UnboundedSender<Completion>) {
    let client = client.clone();
    debug!(generation = ticket.generation, fen = %ticket.fen, "Dispatching analysis");
    tokio::spawn(async move {
        let outcome = client.request_analysis(&ticket.fen, ticket.depth).await;
        let _ = done.send(Completion { ticket, outcome });
    });
}
