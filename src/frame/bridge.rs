//! Frame ↔ parent message transport.
//!
//! Outbound: fire-and-forget `EventMessage` posts through a [`MessageSink`].
//! Inbound: raw values parsed into a command enum; anything that does not
//! parse is dropped without error, since the same channel may carry
//! messages not intended for this consumer.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use serde::de::DeserializeOwned;

use super::message::{BridgeEvent, EventMessage, FrameKey};

pub trait MessageSink {
    fn post(&self, message: EventMessage);
}

/// Outbound half of the bridge: holds the frame identity once assigned and
/// stamps it onto every event.
pub struct Bridge<S: MessageSink> {
    key: Option<FrameKey>,
    sink: S,
}

impl<S: MessageSink> Bridge<S> {
    pub fn new(sink: S) -> Self {
        Self { key: None, sink }
    }

    /// Assign the frame identity. Called once, from `init`.
    pub fn bind(&mut self, key: FrameKey) {
        self.key = Some(key);
    }

    pub fn key(&self) -> Option<&FrameKey> {
        self.key.as_ref()
    }

    /// Post an event to the parent. Dropped silently when no identity is
    /// bound yet or the receiving side is gone.
    pub fn send(&self, event: BridgeEvent) {
        let Some(key) = &self.key else {
            return;
        };
        self.sink.post(EventMessage {
            key: key.clone(),
            event,
        });
    }
}

/// Parse an inbound raw message into a command. `None` means the message is
/// not for this consumer and must be ignored.
pub fn parse_command<C: DeserializeOwned>(raw: &serde_json::Value) -> Option<C> {
    serde_json::from_value(raw.clone()).ok()
}

#[derive(Clone)]
pub struct FrameChannelSender {
    tx: Sender<EventMessage>,
}

pub struct FrameChannelReceiver {
    rx: Receiver<EventMessage>,
}

/// Default in-process transport: FIFO per channel, unbounded, no ack.
pub fn frame_channel() -> (FrameChannelSender, FrameChannelReceiver) {
    let (tx, rx) = mpsc::channel();
    (FrameChannelSender { tx }, FrameChannelReceiver { rx })
}

impl MessageSink for FrameChannelSender {
    fn post(&self, message: EventMessage) {
        // fire into the void: a detached parent is not an error
        let _ = self.tx.send(message);
    }
}

impl FrameChannelReceiver {
    pub fn try_recv(&mut self) -> Result<EventMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn drain(&mut self) -> Vec<EventMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }
}
