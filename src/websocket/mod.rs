//! WebSocket Dashboard Sessions
//!
//! The reactive side of the dashboard: each connection owns one selection,
//! and every selection change is answered with all four views recomputed
//! from that selection.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Tracks sessions, their selections and revisions
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8050/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'set_metric', metric: 'Deaths'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'views') render(msg.views);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage};
