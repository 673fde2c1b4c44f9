//! The single logical channel between one UI panel and the host.
//!
//! Outbound sends are fire-and-forget. Inbound envelopes arrive as text, are
//! decoded here and handed to every subscriber in arrival order. Anything that
//! does not decode, or decodes to an unknown kind, is logged and dropped.

use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::{EnvelopeError, ExtensionMessage, WebviewMessage};

pub type SubscriptionId = u64;

type Handler = Box<dyn FnMut(&ExtensionMessage)>;

/// Cloneable, non-blocking handle for sending envelopes to the host.
#[derive(Debug, Clone)]
pub struct HostSender {
    tx: mpsc::UnboundedSender<WebviewMessage>,
}

impl HostSender {
    /// Queue `message` for the host. Nothing is reported back; a host that
    /// has gone away simply never sees it.
    pub fn send(&self, message: WebviewMessage) {
        debug!(kind = message.kind(), "Sending envelope to host");
        let _ = self.tx.send(message);
    }
}

/// What happened to one inbound envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    Delivered,
    Ignored,
}

/// UI side of the channel.
pub struct MessageBus {
    outbound: HostSender,
    inbound: mpsc::UnboundedReceiver<String>,
    handlers: Vec<(SubscriptionId, Handler)>,
    next_subscription: SubscriptionId,
}

/// Host side of the channel. The host itself is opaque; this endpoint is how
/// a transport or a test stands in for it.
pub struct HostEndpoint {
    outbound: mpsc::UnboundedReceiver<WebviewMessage>,
    inbound: mpsc::UnboundedSender<String>,
}

impl MessageBus {
    pub fn channel() -> (MessageBus, HostEndpoint) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let bus = MessageBus {
            outbound: HostSender { tx: out_tx },
            inbound: in_rx,
            handlers: Vec::new(),
            next_subscription: 0,
        };
        let host = HostEndpoint {
            outbound: out_rx,
            inbound: in_tx,
        };
        (bus, host)
    }

    pub fn sender(&self) -> HostSender {
        self.outbound.clone()
    }

    pub fn send(&self, message: WebviewMessage) {
        self.outbound.send(message);
    }

    /// Register `handler` to run once per delivered envelope.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&ExtensionMessage) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Deliver everything already queued. Returns how many envelopes reached
    /// the subscribers.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(text) = self.inbound.try_recv() {
            if self.deliver_text(&text) == Inbound::Delivered {
                delivered += 1;
            }
        }
        delivered
    }

    /// Wait for the next inbound envelope and deliver it. `None` once the
    /// host endpoint is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<Inbound> {
        let text = self.inbound.recv().await?;
        Some(self.deliver_text(&text))
    }

    fn deliver_text(&mut self, text: &str) -> Inbound {
        let message = match ExtensionMessage::from_json(text) {
            Ok(message) => message,
            Err(err) => {
                debug!(error = %err, "Dropping malformed envelope");
                return Inbound::Ignored;
            }
        };
        if message.is_unknown() {
            debug!("Dropping envelope of unrecognized kind");
            return Inbound::Ignored;
        }

        debug!(
            kind = message.kind(),
            subscribers = self.handlers.len(),
            "Delivering envelope"
        );
        for (_, handler) in self.handlers.iter_mut() {
            handler(&message);
        }
        Inbound::Delivered
    }
}

impl HostEndpoint {
    pub fn push(&self, message: &ExtensionMessage) -> Result<(), EnvelopeError> {
        let text = message.to_json()?;
        self.push_raw(text);
        Ok(())
    }

    /// Push pre-encoded text, valid or not.
    pub fn push_raw(&self, text: impl Into<String>) {
        let _ = self.inbound.send(text.into());
    }

    pub fn try_next(&mut self) -> Option<WebviewMessage> {
        self.outbound.try_recv().ok()
    }

    /// Everything the UI has sent so far, oldest first.
    pub fn drain_sent(&mut self) -> Vec<WebviewMessage> {
        let mut sent = Vec::new();
        while let Some(message) = self.try_next() {
            sent.push(message);
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SystemPrompt;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bus: &mut MessageBus) -> Rc<RefCell<Vec<&'static str>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |message| sink.borrow_mut().push(message.kind()));
        seen
    }

    #[test]
    fn send_is_fire_and_forget() {
        let (bus, mut host) = MessageBus::channel();
        bus.send(WebviewMessage::load_system_prompts());
        bus.sender().send(WebviewMessage::cancel_task());
        assert_eq!(
            host.drain_sent(),
            vec![WebviewMessage::LoadSystemPrompts, WebviewMessage::CancelTask]
        );
    }

    #[test]
    fn send_after_host_dropped_does_not_fail() {
        let (bus, host) = MessageBus::channel();
        drop(host);
        bus.send(WebviewMessage::WebviewDidLaunch);
    }

    #[test]
    fn delivers_in_arrival_order_to_every_subscriber() {
        let (mut bus, host) = MessageBus::channel();
        let first = recorder(&mut bus);
        let second = recorder(&mut bus);

        host.push(&ExtensionMessage::system_prompts(vec![SystemPrompt::new("cline", "cline", "default")]))
            .unwrap();
        host.push(&ExtensionMessage::Error {
            text: "provider unreachable".into(),
        })
        .unwrap();

        assert_eq!(bus.drain(), 2);
        assert_eq!(*first.borrow(), ["systemPrompts", "error"]);
        assert_eq!(*second.borrow(), ["systemPrompts", "error"]);
    }

    #[test]
    fn malformed_and_unknown_envelopes_are_dropped() {
        let (mut bus, host) = MessageBus::channel();
        let seen = recorder(&mut bus);

        host.push_raw("{not json");
        host.push_raw(r#"{"type":"selectedSystemPrompt"}"#);
        host.push_raw(r#"{"type":"somethingNewer","payload":1}"#);

        assert_eq!(bus.drain(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribed_handler_stops_receiving() {
        let (mut bus, host) = MessageBus::channel();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);

        host.push(&ExtensionMessage::system_prompts(Vec::new()))
            .unwrap();
        bus.drain();
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        host.push(&ExtensionMessage::system_prompts(Vec::new()))
            .unwrap();
        bus.drain();

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn recv_reports_closed_channel() {
        let (mut bus, host) = MessageBus::channel();
        host.push_raw(r#"{"type":"error","text":"boom"}"#);
        drop(host);
        assert_eq!(bus.recv().await, Some(Inbound::Delivered));
        assert_eq!(bus.recv().await, None);
    }
}
