// src/listener.rs
//! Event sinks bound to participant addresses.
//!
//! The registry only stores listeners; it never calls them. This module gives
//! spaces a common trait to dispatch through and a mailbox-backed listener
//! that hands events to an async receiver.

use bytes::Bytes;
use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
use tokio::sync::mpsc;

/// An event dispatched to a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Free-form description of the emitter (usually its address).
    pub source: String,
    pub payload: Bytes,
}

impl Event {
    pub fn new(source: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self { source: source.into(), payload: payload.into() }
    }
}

/// Receiving endpoint of a participant.
pub trait EventListener: Send + Sync {
    /// Deliver `event`. On failure the event is handed back.
    fn receive_event(&self, event: Event) -> Result<(), Event>;
}

#[derive(Clone)]
enum EventSender {
    Unbounded(mpsc::UnboundedSender<Event>),
    Bounded(mpsc::Sender<Event>),
}

enum EventReceiver {
    Unbounded(mpsc::UnboundedReceiver<Event>),
    Bounded(mpsc::Receiver<Event>),
}

/// Sender half of a participant mailbox, usable as an [`EventListener`].
#[derive(Clone)]
pub struct MailboxListener {
    tx: EventSender,
    /// Events accepted but not yet received.
    counter: Arc<AtomicUsize>,
}

/// Receiver half of a participant mailbox.
pub struct MailboxReceiver {
    rx: EventReceiver,
    counter: Arc<AtomicUsize>,
}

/// Create an unbounded mailbox (listener, receiver).
pub fn mailbox() -> (MailboxListener, MailboxReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let counter = Arc::new(AtomicUsize::new(0));
    (
        MailboxListener { tx: EventSender::Unbounded(tx), counter: counter.clone() },
        MailboxReceiver { rx: EventReceiver::Unbounded(rx), counter },
    )
}

/// Create a bounded mailbox. When `capacity` events are queued, further
/// deliveries are rejected (drop-new). A capacity of 0 is treated as 1.
pub fn bounded_mailbox(capacity: usize) -> (MailboxListener, MailboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let counter = Arc::new(AtomicUsize::new(0));
    (
        MailboxListener { tx: EventSender::Bounded(tx), counter: counter.clone() },
        MailboxReceiver { rx: EventReceiver::Bounded(rx), counter },
    )
}

impl MailboxListener {
    /// Number of events currently queued in this mailbox.
    pub fn len(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventListener for MailboxListener {
    fn receive_event(&self, event: Event) -> Result<(), Event> {
        // count before enqueueing so a fast receiver never underflows
        self.counter.fetch_add(1, Ordering::SeqCst);
        let res = match &self.tx {
            EventSender::Unbounded(tx) => tx.send(event).map_err(|e| e.0),
            EventSender::Bounded(tx) => tx.try_send(event).map_err(|e| match e {
                mpsc::error::TrySendError::Full(ev) => ev,
                mpsc::error::TrySendError::Closed(ev) => ev,
            }),
        };
        if res.is_err() {
            self.counter.fetch_sub(1, Ordering::SeqCst);
        }
        res
    }
}

impl MailboxReceiver {
    /// Await the next event. Returns `None` once every listener clone is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        let ev = match &mut self.rx {
            EventReceiver::Unbounded(rx) => rx.recv().await,
            EventReceiver::Bounded(rx) => rx.recv().await,
        };
        if ev.is_some() {
            self.counter.fetch_sub(1, Ordering::SeqCst);
        }
        ev
    }

    pub fn try_recv(&mut self) -> Option<Event> {
        let ev = match &mut self.rx {
            EventReceiver::Unbounded(rx) => rx.try_recv().ok(),
            EventReceiver::Bounded(rx) => rx.try_recv().ok(),
        };
        if ev.is_some() {
            self.counter.fetch_sub(1, Ordering::SeqCst);
        }
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deliver_and_recv() {
        let (listener, mut rx) = mailbox();
        listener
            .receive_event(Event::new("agent-1", Bytes::from_static(b"hello")))
            .unwrap();
        assert_eq!(listener.len(), 1);

        let got = rx.recv().await.expect("should receive");
        assert_eq!(got.source, "agent-1");
        assert_eq!(got.payload.as_ref(), b"hello");
        assert!(listener.is_empty());
    }

    #[tokio::test]
    async fn bounded_mailbox_drop_new() {
        let (listener, mut rx) = bounded_mailbox(2);
        listener.receive_event(Event::new("a", Bytes::from_static(b"m1"))).unwrap();
        listener.receive_event(Event::new("a", Bytes::from_static(b"m2"))).unwrap();

        let rejected = listener
            .receive_event(Event::new("a", Bytes::from_static(b"m3")))
            .expect_err("third event should be rejected");
        assert_eq!(rejected.payload.as_ref(), b"m3");
        assert_eq!(listener.len(), 2);

        assert_eq!(rx.recv().await.expect("first").payload.as_ref(), b"m1");
        assert_eq!(rx.recv().await.expect("second").payload.as_ref(), b"m2");
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn zero_capacity_mailbox_holds_one_event() {
        let (listener, mut rx) = bounded_mailbox(0);
        listener.receive_event(Event::new("a", Bytes::from_static(b"only"))).unwrap();
        assert!(listener
            .receive_event(Event::new("a", Bytes::from_static(b"extra")))
            .is_err());
        assert_eq!(rx.recv().await.expect("first").payload.as_ref(), b"only");
    }

    #[test]
    fn delivery_to_closed_mailbox_hands_event_back() {
        let (listener, rx) = mailbox();
        drop(rx);
        let ev = Event::new("a", Bytes::from_static(b"lost"));
        assert_eq!(listener.receive_event(ev.clone()), Err(ev));
        assert!(listener.is_empty());
    }
}
