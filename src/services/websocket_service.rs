use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::ClientMessage,
    services::{answer_service, room_service, session_service},
    state::{PlayerConnection, SharedState},
};

const IDENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle the full lifecycle for an individual player WebSocket connection.
///
/// The first text frame must be a `join_room` message; it binds the socket
/// to a player id and a room. Every later frame is routed to the matching
/// service. When the socket closes the player is removed from whichever
/// room still holds them, unless a newer connection has already rebound
/// the same player id.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let initial_message = match tokio::time::timeout(IDENT_TIMEOUT, receiver.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => text,
        Ok(Some(Ok(Message::Close(_)))) => {
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(Some(Ok(_))) => {
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(Some(Err(err))) => {
            warn!(error = %err, "websocket receive error");
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(None) | Err(_) => {
            warn!("websocket identification timed out");
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };

    let inbound = match ClientMessage::from_json_str(&initial_message) {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "failed to parse or validate client message");
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };

    let ClientMessage::JoinRoom { room_code, player } = inbound else {
        warn!("first message was not join_room");
        let _ = outbound_tx.send(Message::Close(None));
        finalize(writer_task, outbound_tx).await;
        return;
    };

    let player_id = player.id;
    let bound_room = room_code.clone();

    state.connections().insert(
        player_id,
        PlayerConnection {
            id: player_id,
            tx: outbound_tx.clone(),
        },
    );

    room_service::join(&state, &bound_room, player_id, player.display_name).await;
    info!(id = %player_id, room = %bound_room, "player connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(id = %player_id, payload = %text, "received client message");

                match ClientMessage::from_json_str(&text) {
                    Ok(msg) => handle_client_message(&state, player_id, &bound_room, msg).await,
                    Err(err) => {
                        warn!(id = %player_id, error = %err, "failed to parse or validate client message");
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(id = %player_id, "player closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %player_id, error = %err, "websocket error");
                break;
            }
        }
    }

    // A fresh socket may have rebound this player id while we were draining;
    // only tear down state that still belongs to this connection.
    let owns_connection = state
        .connections()
        .get(&player_id)
        .is_some_and(|conn| conn.tx.same_channel(&outbound_tx));
    if owns_connection {
        state.connections().remove(&player_id);
        room_service::disconnect(&state, player_id).await;
        info!(id = %player_id, "player disconnected");
    }

    finalize(writer_task, outbound_tx).await;
}

/// Route an already-bound connection's message to the owning service.
async fn handle_client_message(
    state: &SharedState,
    player_id: Uuid,
    bound_room: &str,
    message: ClientMessage,
) {
    match message {
        ClientMessage::JoinRoom { room_code, .. } => {
            if room_code == bound_room {
                debug!(id = %player_id, "ignoring duplicate join_room for bound room");
            } else {
                warn!(id = %player_id, room = %room_code, "join_room for another room ignored");
            }
        }
        ClientMessage::Ready { room_code } => {
            session_service::mark_ready(state, &room_code, player_id).await;
        }
        ClientMessage::StartQuiz { room_code } => {
            session_service::start(state, &room_code).await;
        }
        ClientMessage::KickStudent {
            room_code,
            target_id,
        } => {
            room_service::kick(state, &room_code, target_id).await;
        }
        ClientMessage::SubmitAnswer {
            room_code,
            player_id: claimed_id,
            question_index,
            selected_option_index,
        } => {
            if claimed_id != player_id {
                warn!(
                    id = %player_id,
                    claimed = %claimed_id,
                    "submission ignored: mismatched player id"
                );
                return;
            }
            answer_service::submit(
                state,
                &room_code,
                player_id,
                question_index,
                selected_option_index,
            )
            .await;
        }
        ClientMessage::Unknown => {
            warn!(id = %player_id, "unrecognised message type");
        }
    }
}

async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
