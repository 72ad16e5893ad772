//! WebSocket Connection Hub
//!
//! Tracks every open dashboard session together with the selection it
//! currently shows and how many times that selection has changed.

use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::ServerMessage;
use crate::views::Selection;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket sessions
pub struct ConnectionHub {
    /// Active sessions: ConnectionId → Session
    sessions: RwLock<HashMap<ConnectionId, Session>>,
    /// Configuration
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// State of one dashboard session
struct Session {
    /// Channel sender for this connection
    sender: mpsc::UnboundedSender<ServerMessage>,
    /// Selection the client currently shows
    selection: Selection,
    /// Number of selection changes applied so far
    revision: u64,
}

impl ConnectionHub {
    /// Create a new connection hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new session starting at `selection` with revision 0
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
        selection: Selection,
    ) -> Result<ConnectionId, HubError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        sessions.insert(
            id.clone(),
            Session {
                sender,
                selection,
                revision: 0,
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a session
    pub async fn unregister(&self, id: &str) {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::info!(connection_id = %id, "WebSocket disconnected");
        }
    }

    /// Current selection of a session
    pub async fn selection(&self, id: &str) -> Result<Selection, HubError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id).ok_or(HubError::ConnectionNotFound)?;
        Ok(session.selection.clone())
    }

    /// Replace a session's selection and return the new revision
    pub async fn update_selection(&self, id: &str, selection: Selection) -> Result<u64, HubError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        session.selection = selection;
        session.revision += 1;

        tracing::debug!(
            connection_id = %id,
            revision = session.revision,
            countries = session.selection.countries.len(),
            metric = %session.selection.metric,
            "Selection changed"
        );

        Ok(session.revision)
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id).ok_or(HubError::ConnectionNotFound)?;

        session
            .sender
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metric;

    fn selection() -> Selection {
        Selection::new(["US", "India", "Brazil"], Metric::Confirmed)
    }

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();
        assert_eq!(config.max_connections, 1000);
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx, selection()).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.selection(&id).await.unwrap(), selection());

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
        assert!(matches!(
            hub.selection(&id).await,
            Err(HubError::ConnectionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_selection_increments_revision() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx, selection()).await.unwrap();

        let first = hub
            .update_selection(&id, selection().with_metric(Metric::Deaths))
            .await
            .unwrap();
        let second = hub
            .update_selection(&id, selection().with_countries(["Chile"]))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let current = hub.selection(&id).await.unwrap();
        assert_eq!(current.metric, Metric::Confirmed);
        assert!(current.countries.contains("Chile"));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        let id1 = hub.register(tx1, selection()).await.unwrap();
        let id2 = hub.register(tx2, selection()).await.unwrap();

        hub.update_selection(&id1, selection().with_metric(Metric::Recovered))
            .await
            .unwrap();

        assert_eq!(hub.selection(&id1).await.unwrap().metric, Metric::Recovered);
        assert_eq!(hub.selection(&id2).await.unwrap().metric, Metric::Confirmed);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 2 });

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();
        let (tx3, _) = mpsc::unbounded_channel();

        let id1 = hub.register(tx1, selection()).await.unwrap();
        let id2 = hub.register(tx2, selection()).await.unwrap();
        let result = hub.register(tx3, selection()).await;

        assert!(matches!(result, Err(HubError::TooManyConnections(2))));

        hub.unregister(&id1).await;
        hub.unregister(&id2).await;
    }

    #[tokio::test]
    async fn test_send_to() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx, selection()).await.unwrap();

        hub.send_to(&id, ServerMessage::Pong).await.unwrap();
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Pong)));

        assert!(matches!(
            hub.send_to("missing", ServerMessage::Pong).await,
            Err(HubError::ConnectionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_send_to_closed_receiver() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.register(tx, selection()).await.unwrap();
        drop(rx);

        assert!(matches!(
            hub.send_to(&id, ServerMessage::Pong).await,
            Err(HubError::SendFailed)
        ));
    }
}
