//! End-to-end: a real socket attached to the hub receives published events.

use std::time::Duration;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::StreamExt;
use saffron_core::{KitchenPublisher, KITCHEN_CHANNEL, ORDER_PLACED_EVENT};
use saffron_kitchen::{KitchenHub, KitchenMessage, Subscriber};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<KitchenHub>) -> impl IntoResponse {
    let subscriber = Subscriber {
        staff_id: "staff-9".to_string(),
        name: "Chef Omar".to_string(),
    };
    ws.on_upgrade(move |socket| hub.attach(socket, KITCHEN_CHANNEL.to_string(), subscriber))
}

async fn next_message<S>(stream: &mut S) -> KitchenMessage
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("message within timeout")
            .expect("stream open")
            .expect("valid frame");

        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_display_receives_order_placed() {
    let hub = KitchenHub::new(16).unwrap();
    let app = Router::new()
        .route("/ws/kitchen", get(ws_handler))
        .with_state(hub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/kitchen", addr))
        .await
        .unwrap();

    match next_message(&mut socket).await {
        KitchenMessage::Welcome(welcome) => {
            assert_eq!(welcome.channel, KITCHEN_CHANNEL);
            assert_eq!(welcome.subscriber, "Chef Omar");
        }
        other => panic!("expected Welcome, got {other:?}"),
    }
    assert_eq!(hub.subscriber_count(), 1);

    // Other channels are filtered out
    hub.publish("bar-channel", "drink.ready", json!({ "id": 1 })).unwrap();
    hub.publish(KITCHEN_CHANNEL, ORDER_PLACED_EVENT, json!({ "order_id": "o-42" }))
        .unwrap();

    match next_message(&mut socket).await {
        KitchenMessage::Event(event) => {
            assert_eq!(event.event, ORDER_PLACED_EVENT);
            assert_eq!(event.payload["order_id"], "o-42");
        }
        other => panic!("expected Event, got {other:?}"),
    }
}
