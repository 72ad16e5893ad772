//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! dashboard clients and the Epiboard server.

use serde::{Deserialize, Serialize};

use crate::api::dto::ViewsResponse;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Replace the whole selection
    Select {
        countries: Vec<String>,
        metric: String,
    },
    /// Change the country selector, keeping the metric
    SetCountries { countries: Vec<String> },
    /// Change the metric selector, keeping the countries
    SetMetric { metric: String },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Fresh views for the connection's current selection
    Views {
        /// Increases by one with every selection change; clients drop
        /// anything older than the latest revision they have seen
        revision: u64,
        views: Box<ViewsResponse>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}
