//! WebSocket Handler
//!
//! Upgrades `/api/v1/ws` requests and runs one dashboard session per socket.
//! Incoming selection changes are processed one at a time per connection;
//! each accepted change yields exactly one `views` message.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::ConnectionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::dto::ViewsResponse;
use crate::api::AppState;
use crate::data::Metric;
use crate::views::{DashboardContext, Selection, ViewResult};

/// GET /api/v1/ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.ws_hub);
    let dashboard = state.dashboard.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub, dashboard))
}

/// Run a session until either side hangs up
async fn handle_socket(socket: WebSocket, hub: Arc<ConnectionHub>, dashboard: DashboardContext) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let initial = dashboard.defaults().clone();
    let connection_id = match hub.register(tx, initial.clone()).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register WebSocket connection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Some(text) = encode(&error_msg) {
                let _ = sender.send(text).await;
            }
            return;
        }
    };

    // The connected message must precede anything queued on the channel
    let connected_msg = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    let sent = match encode(&connected_msg) {
        Some(text) => sender.send(text).await.is_ok(),
        None => false,
    };
    if !sent {
        tracing::error!(connection_id = %connection_id, "Failed to send connected message");
        hub.unregister(&connection_id).await;
        return;
    }

    let _ = hub
        .send_to(&connection_id, views_message(&dashboard, initial, 0))
        .await;

    let conn_id_for_send = connection_id.clone();

    // Outbound: channel -> socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(text) = encode(&msg) else {
                continue;
            };
            if sender.send(text).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    // Inbound: socket -> selection changes
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &dashboard, &conn_id_for_recv, msg).await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&connection_id).await;
}

/// Serialize a server message into a text frame
fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Derive all views for a selection and wrap them for the client
fn views_message(dashboard: &DashboardContext, selection: Selection, revision: u64) -> ServerMessage {
    let views = dashboard.derive_all(&selection);
    ServerMessage::Views {
        revision,
        views: Box::new(ViewsResponse::new(selection, views)),
    }
}

/// Process one frame; `false` ends the session
async fn handle_ws_message(
    hub: &ConnectionHub,
    dashboard: &DashboardContext,
    connection_id: &str,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(hub, dashboard, connection_id, client_msg).await;
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Dispatch a decoded client message
async fn handle_client_message(
    hub: &ConnectionHub,
    dashboard: &DashboardContext,
    connection_id: &str,
    message: ClientMessage,
) {
    match message {
        ClientMessage::Select { countries, metric } => {
            apply_change(hub, dashboard, connection_id, |_| {
                Ok(Selection::new(countries, metric.parse::<Metric>()?))
            })
            .await;
        }
        ClientMessage::SetCountries { countries } => {
            apply_change(hub, dashboard, connection_id, |current| {
                Ok(current.with_countries(countries))
            })
            .await;
        }
        ClientMessage::SetMetric { metric } => {
            apply_change(hub, dashboard, connection_id, |current| {
                Ok(current.with_metric(metric.parse::<Metric>()?))
            })
            .await;
        }
        ClientMessage::Ping => {
            let _ = hub.send_to(connection_id, ServerMessage::Pong).await;
        }
    }
}

/// Apply a selection change and push the recomputed views
///
/// A rejected change leaves the session's selection and revision untouched.
async fn apply_change<F>(
    hub: &ConnectionHub,
    dashboard: &DashboardContext,
    connection_id: &str,
    change: F,
) where
    F: FnOnce(&Selection) -> ViewResult<Selection>,
{
    let current = match hub.selection(connection_id).await {
        Ok(selection) => selection,
        Err(e) => {
            tracing::error!(connection_id = %connection_id, error = %e, "Selection lookup failed");
            return;
        }
    };

    let selection = match change(&current) {
        Ok(selection) => selection,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, error = %e, "Selection rejected");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            return;
        }
    };

    match hub.update_selection(connection_id, selection.clone()).await {
        Ok(revision) => {
            let message = views_message(dashboard, selection, revision);
            let _ = hub.send_to(connection_id, message).await;
        }
        Err(e) => {
            tracing::error!(connection_id = %connection_id, error = %e, "Selection update failed");
        }
    }
}
