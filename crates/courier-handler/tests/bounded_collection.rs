//! End-to-end dispatch and collection scenarios.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::timeout;

use courier_core::{BoxedEvent, Context, Event, EventHub, EventType};
use courier_handler::{Dispatcher, Traced, handler_fn};

struct ChatMessage {
    channel: &'static str,
    sender: &'static str,
    seq: usize,
    bot: bool,
}

impl Event for ChatMessage {
    fn event_name(&self) -> &'static str {
        "message_create"
    }

    fn event_type(&self) -> EventType {
        EventType::Message
    }

    fn channel_id(&self) -> Option<&str> {
        Some(self.channel)
    }

    fn sender_id(&self) -> Option<&str> {
        Some(self.sender)
    }

    fn sender_is_bot(&self) -> bool {
        self.bot
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn chat(channel: &'static str, sender: &'static str, seq: usize) -> BoxedEvent {
    BoxedEvent::new(ChatMessage {
        channel,
        sender,
        seq,
        bot: false,
    })
}

fn seq(event: &BoxedEvent) -> usize {
    event.downcast_ref::<ChatMessage>().unwrap().seq
}

/// Publishes 12 same-channel messages; a collector takes exactly 10 and
/// cancels. The 11th and 12th must never surface and a further read must
/// observe end-of-stream rather than block.
#[tokio::test]
async fn collects_ten_then_cancels() {
    let hub = EventHub::new();
    let mut collector =
        hub.subscribe(|e| e.channel_id() == Some("general") && !e.sender_is_bot());

    for i in 1..=12 {
        hub.publish(&chat("general", "alice", i));
    }

    let mut seen = Vec::new();
    while let Some(event) = collector.next().await {
        seen.push(seq(&event));
        if seen.len() >= 10 {
            collector.cancel();
        }
    }

    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    let after = timeout(Duration::from_millis(100), collector.next())
        .await
        .expect("read after cancel must not block");
    assert!(after.is_none());
    assert_eq!(hub.subscriber_count(), 0);
}

/// Bot messages and other channels are filtered out before delivery.
#[tokio::test]
async fn predicate_screens_senders_and_channels() {
    let hub = EventHub::new();
    let mut collector =
        hub.subscribe(|e| e.channel_id() == Some("general") && !e.sender_is_bot());

    hub.publish(&chat("general", "alice", 1));
    hub.publish(&BoxedEvent::new(ChatMessage {
        channel: "general",
        sender: "helper-bot",
        seq: 2,
        bot: true,
    }));
    hub.publish(&chat("random", "alice", 3));
    hub.publish(&chat("general", "bob", 4));
    hub.shutdown();

    assert_eq!(collector.next().await.map(|e| seq(&e)), Some(1));
    assert_eq!(collector.next().await.map(|e| seq(&e)), Some(4));
    assert!(collector.next().await.is_none());
}

/// A terminal handler spawns a follow-up collector on the dispatcher's hub
/// and awaits later events from independently scheduled work — the
/// "collect the user's next few messages" pattern.
#[tokio::test]
async fn handler_spawns_follow_up_collector() {
    let hub = EventHub::new();
    let (done_tx, done_rx) = oneshot::channel();
    let done_tx = std::sync::Mutex::new(Some(done_tx));

    let follow_up_hub = hub.clone();
    let dispatcher = Dispatcher::builder()
        .hub(hub.clone())
        .middleware(Traced::new("root"))
        .handler(handler_fn(move |_ctx, event| {
            let hub = follow_up_hub.clone();
            let done = done_tx.lock().unwrap().take();
            async move {
                // Only the first interaction starts a collection.
                let Some(done) = done else { return Ok(()) };
                let channel = event.channel_id().unwrap_or_default().to_string();

                let mut replies = hub.subscribe(move |e: &BoxedEvent| {
                    e.channel_id() == Some(channel.as_str()) && !e.sender_is_bot()
                });
                tokio::spawn(async move {
                    let mut collected = Vec::new();
                    while let Some(reply) = replies.next().await {
                        collected.push(seq(&reply));
                        if collected.len() == 2 {
                            replies.cancel();
                        }
                    }
                    let _ = done.send(collected);
                });
                Ok(())
            }
        }));

    let ctx = Arc::new(Context::new());
    dispatcher
        .dispatch(Arc::clone(&ctx), chat("general", "alice", 0))
        .await
        .unwrap();

    for i in 1..=3 {
        dispatcher
            .dispatch(Arc::clone(&ctx), chat("general", "alice", i))
            .await
            .unwrap();
    }

    let collected = timeout(Duration::from_secs(1), done_rx)
        .await
        .expect("collection must finish")
        .unwrap();
    assert_eq!(collected, [1, 2]);
}
