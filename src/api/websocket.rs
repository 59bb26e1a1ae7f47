use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};
use tokio::sync::{broadcast::error::RecvError, Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::handlers::AppState;
use crate::domain::HistoryEntry;
use crate::services::HistoryEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientCommand {
    SubscribeCoin { coin: String },
    UnsubscribeCoin { coin: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsMessage {
    Connected { message: String },
    CalculationRecorded { entry: HistoryEntry },
    HistoryEntryDeleted { id: Uuid },
    HistoryCleared,
    Error { message: String },
}

fn encode(msg: &WsMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            error!("Failed to encode WebSocket message: {}", e);
            None
        }
    }
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| websocket_handler(socket, state))
}

async fn websocket_handler(socket: WebSocket, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(Mutex::new(sender));

    let mut history_rx = state.history.subscribe();

    info!("WebSocket client connected");

    // Empty means every coin
    let subscribed_coins: Arc<RwLock<HashSet<String>>> = Arc::new(RwLock::new(HashSet::new()));

    let welcome = WsMessage::Connected {
        message: "Connected to leverage calculator".to_string(),
    };
    if let Some(msg) = encode(&welcome) {
        if let Err(e) = sender.lock().await.send(msg).await {
            error!("Failed to send welcome message: {}", e);
            return;
        }
    }

    let recv_sender = Arc::clone(&sender);
    let recv_subscriptions = Arc::clone(&subscribed_coins);
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(ClientCommand::SubscribeCoin { coin }) => {
                        info!("Client subscribed to coin: {}", coin);
                        recv_subscriptions.write().await.insert(coin);
                    }
                    Ok(ClientCommand::UnsubscribeCoin { coin }) => {
                        info!("Client unsubscribed from coin: {}", coin);
                        recv_subscriptions.write().await.remove(&coin);
                    }
                    Err(e) => {
                        let error_msg = WsMessage::Error {
                            message: format!("Invalid command: {}", e),
                        };
                        if let Some(reply) = encode(&error_msg) {
                            if let Err(e) = recv_sender.lock().await.send(reply).await {
                                error!("Failed to send error message: {}", e);
                                break;
                            }
                        }
                    }
                },
                Message::Close(_) => {
                    info!("Client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    let send_sender = Arc::clone(&sender);
    let send_subscriptions = Arc::clone(&subscribed_coins);
    let send_task = tokio::spawn(async move {
        loop {
            let event = match history_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("WebSocket client lagged, skipped {} history events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let msg = match event {
                HistoryEvent::Recorded(entry) => {
                    let subs = send_subscriptions.read().await;
                    if !subs.is_empty() && !subs.contains(&entry.coin) {
                        continue;
                    }
                    WsMessage::CalculationRecorded { entry }
                }
                HistoryEvent::Deleted(id) => WsMessage::HistoryEntryDeleted { id },
                HistoryEvent::Cleared => WsMessage::HistoryCleared,
            };

            let Some(msg) = encode(&msg) else {
                continue;
            };
            if let Err(e) = send_sender.lock().await.send(msg).await {
                warn!("Failed to send history update: {}", e);
                break;
            }
        }
    });

    tokio::pin!(recv_task);
    tokio::pin!(send_task);

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }

    info!("WebSocket connection closed");
}
