//! Per-connection handler: frame decode and dispatch into the registry.
//!
//! Each accepted connection gets its own task. The websocket is split:
//! a writer task drains an unbounded channel into the sink, and that
//! channel's sender is the connection handle handed to the room layer —
//! rooms and heartbeat monitors fan frames out without ever touching the
//! socket directly.
//!
//! The first room-scoped frame on a connection must be the join
//! handshake, which carries the client's stable identity. Room-scoped
//! frames arriving before it are dropped; registry requests (create,
//! list, join check) are connection-scoped and always served.

use futures_util::{SinkExt, StreamExt};
use scrawl_protocol::{
    ApiResponse, ClientId, Frame, GameError, GameErrorKind, JsonCodec,
    RoomList,
};
use scrawl_room::{PlayerSender, Registry};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::ServerError;

/// Drives one connection from websocket accept to close.
///
/// On exit, a connection that had joined a room goes down the
/// grace-window departure path — a reconnect within the window restores
/// the player.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    registry: Registry,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let codec = JsonCodec;
    let mut client_id: Option<ClientId> = None;

    while let Some(message) = source.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "websocket stream error");
                break;
            }
        };
        let text = match message {
            Message::Text(text) => text.as_str().to_owned(),
            Message::Close(_) => break,
            _ => continue,
        };
        let frame = match codec.decode(&text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(error = %e, "dropping undecodable frame");
                continue;
            }
        };
        handle_frame(frame, text, &tx, &mut client_id, &registry).await;
    }

    if let Some(id) = &client_id {
        registry.player_left(id, false).await;
    }
    writer.abort();
    Ok(())
}

async fn handle_frame(
    frame: Frame,
    raw: String,
    tx: &PlayerSender,
    client_id: &mut Option<ClientId>,
    registry: &Registry,
) {
    match frame {
        Frame::JoinRoomHandshake(handshake) => {
            if registry.room(&handshake.room_name).await.is_none() {
                send(
                    tx,
                    &Frame::GameError(GameError {
                        error_type: GameErrorKind::RoomNotFound,
                    }),
                );
                return;
            }
            match registry
                .join_room(
                    &handshake.room_name,
                    handshake.client_id.clone(),
                    handshake.username,
                    tx.clone(),
                )
                .await
            {
                Ok(()) => *client_id = Some(handshake.client_id),
                Err(e) => {
                    tracing::debug!(error = %e, "join rejected");
                    send(
                        tx,
                        &Frame::ApiResponse(ApiResponse {
                            successful: false,
                            message: Some(e.to_string()),
                        }),
                    );
                }
            }
        }

        // A message naming an unknown room is dropped silently; that is
        // policy, not a fault.
        Frame::DrawData(draw) => {
            let Some(id) = client_id.as_ref() else {
                return;
            };
            if let Some(room) = registry.room(&draw.room_name).await {
                let _ = room.draw(id.clone(), raw).await;
            }
        }
        Frame::ChosenWord(chosen) => {
            if client_id.is_none() {
                return;
            }
            if let Some(room) = registry.room(&chosen.room_name).await {
                let _ = room.chosen_word(chosen.chosen_word).await;
            }
        }
        Frame::ChatMessage(message) => {
            if client_id.is_none() {
                return;
            }
            if let Some(room) = registry.room(&message.room_name).await {
                let _ = room.chat(message).await;
            }
        }

        Frame::Pong => {
            if let Some(id) = client_id.as_ref() {
                registry.heartbeat_ack(id).await;
            }
        }

        Frame::CreateRoom(request) => {
            let response = match registry
                .create_room(&request.name, request.max_players)
                .await
            {
                Ok(()) => ApiResponse {
                    successful: true,
                    message: None,
                },
                Err(e) => ApiResponse {
                    successful: false,
                    message: Some(e.to_string()),
                },
            };
            send(tx, &Frame::ApiResponse(response));
        }
        Frame::ListRooms(request) => {
            let rooms =
                registry.list_rooms(request.search_query.as_deref()).await;
            send(tx, &Frame::RoomList(RoomList { rooms }));
        }
        Frame::JoinCheck(check) => {
            let response = match registry
                .check_join(&check.username, &check.room_name)
                .await
            {
                Ok(()) => ApiResponse {
                    successful: true,
                    message: None,
                },
                Err(e) => ApiResponse {
                    successful: false,
                    message: Some(e.to_string()),
                },
            };
            send(tx, &Frame::ApiResponse(response));
        }

        _ => {
            tracing::debug!("ignoring unexpected inbound frame");
        }
    }
}

fn send(tx: &PlayerSender, frame: &Frame) {
    match JsonCodec.encode(frame) {
        Ok(text) => {
            let _ = tx.send(text);
        }
        Err(e) => tracing::warn!(error = %e, "dropping unencodable frame"),
    }
}
