//! # Kitchen Feed Messages
//!
//! Everything a kitchen display receives over its socket.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kitchen Feed Protocol                              │
//! │                                                                         │
//! │  CONNECT (already authorized by the HTTP layer)                        │
//! │  ───────                                                               │
//! │  Hub     ───► Welcome { channel, subscriber, server_time }             │
//! │                                                                         │
//! │  EVENTS                                                                │
//! │  ──────                                                                │
//! │  Hub     ───► Event { channel, event, payload }                        │
//! │               e.g. event = "order.placed", payload = kitchen ticket    │
//! │                                                                         │
//! │  KEEPALIVE                                                             │
//! │  ─────────                                                             │
//! │  WebSocket Ping/Pong frames every 30s                                  │
//! │                                                                         │
//! │  ERROR                                                                 │
//! │  ─────                                                                 │
//! │  Hub     ───► Error { code, message }                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Adjacently tagged JSON:
//! ```json
//! { "type": "Event", "payload": { "channel": "kitchen-channel", "event": "order.placed", "payload": { ... } } }
//! ```
//!
//! Displays never send application messages. Anything they send other
//! than control frames is ignored.

use serde::{Deserialize, Serialize};

/// All messages sent from the hub to a display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum KitchenMessage {
    /// First message after the socket is attached.
    Welcome(WelcomePayload),

    /// A published event.
    Event(KitchenEvent),

    /// Error message.
    Error { code: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomePayload {
    pub channel: String,
    /// Display name of the staff member the socket belongs to.
    pub subscriber: String,
    /// RFC 3339.
    pub server_time: String,
}

/// One published event as it travels through the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenEvent {
    pub channel: String,
    pub event: String,
    pub payload: serde_json::Value,
}

impl KitchenMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let msg = KitchenMessage::Event(KitchenEvent {
            channel: "kitchen-channel".to_string(),
            event: "order.placed".to_string(),
            payload: json!({ "order_id": "o-1", "total_amount": "430.00" }),
        });

        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "Event");
        assert_eq!(value["payload"]["channel"], "kitchen-channel");
        assert_eq!(value["payload"]["event"], "order.placed");
        assert_eq!(value["payload"]["payload"]["total_amount"], "430.00");
    }

    #[test]
    fn test_error_wire_shape() {
        let msg = KitchenMessage::Error {
            code: "LAGGED".to_string(),
            message: "3 events dropped".to_string(),
        };

        let back: KitchenMessage = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(back, msg);
    }
}
