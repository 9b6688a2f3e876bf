//! # Kitchen Hub
//!
//! In-process fan-out from order services to connected kitchen displays.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kitchen Hub Architecture                         │
//! │                                                                         │
//! │  OrderService::create ── publish() ──┐   (sync, never blocks)          │
//! │                                      ▼                                  │
//! │              ┌──────────────────────────────────────┐                  │
//! │              │ broadcast::Sender<KitchenEvent>       │                  │
//! │              └───────┬──────────────┬───────────────┘                  │
//! │                      │              │                                   │
//! │                      ▼              ▼                                   │
//! │              ┌──────────────┐ ┌──────────────┐                          │
//! │              │ attach()     │ │ attach()     │  one task set per socket │
//! │              │ filter by    │ │ filter by    │                          │
//! │              │ channel      │ │ channel      │                          │
//! │              └──────┬───────┘ └──────┬───────┘                          │
//! │                     ▼                ▼                                  │
//! │              ┌──────────┐      ┌──────────┐                             │
//! │              │ Grill    │      │ Bar      │   Kitchen displays          │
//! │              │ display  │      │ display  │                             │
//! │              └──────────┘      └──────────┘                             │
//! │                                                                         │
//! │  Message Flow:                                                          │
//! │  ─────────────                                                          │
//! │  1. HTTP layer authorizes the upgrade and calls attach()               │
//! │  2. Hub subscribes, then sends Welcome                                 │
//! │  3. Matching events are forwarded as Event messages                    │
//! │  4. Hub pings every 30s                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is at-most-once. A display that connects after an event was
//! published never sees it, and a display that falls behind by more than
//! the channel capacity loses the oldest events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::error::{KitchenError, KitchenResult};
use crate::protocol::{KitchenEvent, KitchenMessage, WelcomePayload};
use saffron_core::{KitchenPublisher, PublishError};

// =============================================================================
// Constants
// =============================================================================

/// Default number of events buffered per display before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Ping interval to keep display connections alive.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Outgoing queue per display socket.
const OUTGOING_BUFFER: usize = 64;

// =============================================================================
// Hub
// =============================================================================

/// Who is on the other end of a display socket.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub staff_id: String,
    pub name: String,
}

/// Broadcast hub for kitchen events.
///
/// Cheap to clone; clones share one broadcast channel.
///
/// ## Example
/// ```rust,ignore
/// let hub = KitchenHub::new(DEFAULT_CHANNEL_CAPACITY)?;
/// let orders = OrderService::new(db, Arc::new(hub.clone()));
///
/// // in the upgrade handler
/// ws.on_upgrade(move |socket| hub.attach(socket, KITCHEN_CHANNEL.to_string(), subscriber));
/// ```
#[derive(Debug, Clone)]
pub struct KitchenHub {
    inner: Arc<HubInner>,
}

#[derive(Debug)]
struct HubInner {
    tx: broadcast::Sender<KitchenEvent>,
}

impl KitchenHub {
    /// Creates a hub buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> KitchenResult<Self> {
        if capacity == 0 {
            return Err(KitchenError::InvalidConfig(
                "channel capacity must be at least 1".to_string(),
            ));
        }

        let (tx, _) = broadcast::channel(capacity);
        Ok(KitchenHub {
            inner: Arc::new(HubInner { tx }),
        })
    }

    /// Number of attached displays, across all channels.
    pub fn subscriber_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }

    /// Raw event stream. Sockets use [`KitchenHub::attach`]; this is for
    /// in-process listeners.
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.inner.tx.subscribe()
    }

    /// Runs a display connection until the socket closes.
    ///
    /// The caller has already authorized `subscriber` for `channel`.
    pub async fn attach(self, socket: WebSocket, channel: String, subscriber: Subscriber) {
        let (mut sender, mut receiver) = socket.split();

        // Subscribe before Welcome so nothing published after Welcome is missed
        let mut events = self.subscribe();

        let welcome = KitchenMessage::Welcome(WelcomePayload {
            channel: channel.clone(),
            subscriber: subscriber.name.clone(),
            server_time: chrono::Utc::now().to_rfc3339(),
        });

        if let Err(e) = send_message(&mut sender, &welcome).await {
            warn!(staff_id = %subscriber.staff_id, error = %e, "Failed to send Welcome");
            return;
        }

        info!(
            staff_id = %subscriber.staff_id,
            channel = %channel,
            subscribers = self.subscriber_count(),
            "Kitchen display attached"
        );

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<Message>(OUTGOING_BUFFER);

        // Outgoing message task
        let outgoing_handle = tokio::spawn(async move {
            while let Some(msg) = outgoing_rx.recv().await {
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        // Event forwarding task
        let forward_tx = outgoing_tx.clone();
        let forward_channel = channel.clone();
        let forward_staff = subscriber.staff_id.clone();
        let forward_handle = tokio::spawn(async move {
            loop {
                let msg = match events.recv().await {
                    Ok(event) if event.channel == forward_channel => KitchenMessage::Event(event),
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(staff_id = %forward_staff, skipped, "Kitchen display lagged");
                        KitchenMessage::Error {
                            code: "LAGGED".to_string(),
                            message: format!("{} events dropped", skipped),
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                match msg.to_json() {
                    Ok(json) => {
                        if forward_tx.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to encode kitchen message"),
                }
            }
        });

        // Ping task
        let ping_tx = outgoing_tx.clone();
        let ping_handle = tokio::spawn(async move {
            let mut ping_interval = interval(PING_INTERVAL);
            loop {
                ping_interval.tick().await;
                if ping_tx.send(Message::Ping(axum::body::Bytes::new())).await.is_err() {
                    break;
                }
            }
        });

        // Receive loop: only control frames matter
        loop {
            match receiver.next().await {
                Some(Ok(Message::Ping(data))) => {
                    let _ = outgoing_tx.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) => {
                    debug!(staff_id = %subscriber.staff_id, "Display requested close");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(staff_id = %subscriber.staff_id, error = %e, "Kitchen socket error");
                    break;
                }
                None => break,
            }
        }

        ping_handle.abort();
        forward_handle.abort();
        outgoing_handle.abort();

        info!(staff_id = %subscriber.staff_id, channel = %channel, "Kitchen display detached");
    }
}

impl KitchenPublisher for KitchenHub {
    fn publish(&self, channel: &str, event: &str, payload: serde_json::Value) -> Result<(), PublishError> {
        let event = KitchenEvent {
            channel: channel.to_string(),
            event: event.to_string(),
            payload,
        };

        match self.inner.tx.send(event) {
            Ok(receivers) => {
                debug!(channel = %channel, receivers, "Kitchen event published");
                Ok(())
            }
            Err(_) => Err(PublishError::NoSubscribers {
                channel: channel.to_string(),
            }),
        }
    }
}

/// Sends one message directly on the socket.
async fn send_message(sender: &mut SplitSink<WebSocket, Message>, msg: &KitchenMessage) -> KitchenResult<()> {
    let json = msg.to_json()?;
    sender
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| KitchenError::SendFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use saffron_core::{KITCHEN_CHANNEL, ORDER_PLACED_EVENT};
    use serde_json::json;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(KitchenHub::new(0), Err(KitchenError::InvalidConfig(_))));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = KitchenHub::new(8).unwrap();

        let err = hub
            .publish(KITCHEN_CHANNEL, ORDER_PLACED_EVENT, json!({}))
            .unwrap_err();
        assert!(matches!(err, PublishError::NoSubscribers { ref channel } if channel == KITCHEN_CHANNEL));
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let hub = KitchenHub::new(8).unwrap();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(KITCHEN_CHANNEL, ORDER_PLACED_EVENT, json!({ "order_id": "o-1" }))
            .unwrap();

        for rx in [&mut first, &mut second] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.channel, KITCHEN_CHANNEL);
            assert_eq!(event.event, ORDER_PLACED_EVENT);
            assert_eq!(event.payload["order_id"], "o-1");
        }
    }

    #[tokio::test]
    async fn test_clones_share_channel() {
        let hub = KitchenHub::new(8).unwrap();
        let publisher: Arc<dyn KitchenPublisher> = Arc::new(hub.clone());
        let mut rx = hub.subscribe();

        publisher.publish("bar-channel", "drink.ready", json!(1)).unwrap();
        assert_eq!(rx.recv().await.unwrap().channel, "bar-channel");

        drop(rx);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
