//! WebSocket feed of view snapshots: the current state on connect, then one
//! message per change. Any other client message re-sends the current state.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    Extension,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::session::SessionHandle;
use crate::view::ViewSnapshot;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(session): Extension<SessionHandle>,
) -> impl IntoResponse {
    let updates = session.subscribe();
    ws.on_upgrade(move |socket| stream_snapshots(socket, updates))
}

async fn stream_snapshots(socket: WebSocket, mut updates: watch::Receiver<ViewSnapshot>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        let text = {
            let snapshot = updates.borrow_and_update();
            serde_json::to_string(&*snapshot)
        };
        let text = match text {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to serialize snapshot: {e}");
                break;
            }
        };

        if sender.send(Message::Text(text.into())).await.is_err() {
            break;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    debug!("WebSocket client disconnected");
}
