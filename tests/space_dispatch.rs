//! A space-like owner binding mailbox listeners and dispatching through them.

use std::sync::Arc;

use bytes::Bytes;
use participant_registry::{
    bounded_mailbox, mailbox, AgentAddress, Event, EventListener, ParticipantRegistry, SpaceId,
};

struct Space {
    id: SpaceId,
    participants: ParticipantRegistry<AgentAddress, dyn EventListener>,
}

impl Space {
    fn new() -> Self {
        Self { id: SpaceId::new(), participants: ParticipantRegistry::new() }
    }

    fn join(&self, listener: Arc<dyn EventListener>) -> AgentAddress {
        let addr = AgentAddress::random(self.id);
        self.participants.put(addr, listener).expect("fresh address is never nil");
        addr
    }

    fn leave(&self, addr: &AgentAddress) -> bool {
        self.participants.remove(addr).is_some()
    }

    fn emit_to(&self, to: &AgentAddress, event: Event) -> bool {
        match self.participants.get(to) {
            Some(listener) => listener.receive_event(event).is_ok(),
            None => false,
        }
    }

    /// Deliver to every participant, returning how many accepted the event.
    fn broadcast(&self, event: Event) -> usize {
        self.participants
            .snapshot()
            .into_iter()
            .filter(|(_, listener)| listener.receive_event(event.clone()).is_ok())
            .count()
    }
}

#[tokio::test]
async fn join_emit_leave() {
    let space = Space::new();
    let (listener, mut rx) = mailbox();
    let addr = space.join(Arc::new(listener));

    assert!(space.emit_to(&addr, Event::new("test", Bytes::from_static(b"hello"))));
    let ev = rx.recv().await.expect("delivered");
    assert_eq!(ev.payload.as_ref(), b"hello");

    assert!(space.leave(&addr));
    assert!(!space.leave(&addr));
    assert!(!space.emit_to(&addr, Event::new("test", Bytes::from_static(b"late"))));
    assert!(space.participants.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn broadcast_reaches_every_participant() {
    let space = Arc::new(Space::new());
    let mut receivers = Vec::new();
    for _ in 0..16 {
        let (listener, rx) = mailbox();
        space.join(Arc::new(listener));
        receivers.push(rx);
    }

    let delivered = space.broadcast(Event::new("space", Bytes::from_static(b"tick")));
    assert_eq!(delivered, 16);

    let tasks: Vec<_> = receivers
        .into_iter()
        .map(|mut rx| tokio::spawn(async move { rx.recv().await }))
        .collect();
    for task in tasks {
        let ev = task.await.expect("task").expect("event");
        assert_eq!(ev.source, "space");
    }
}

#[tokio::test]
async fn full_mailbox_rejects_without_unbinding() {
    let space = Space::new();
    let (listener, mut rx) = bounded_mailbox(1);
    let addr = space.join(Arc::new(listener));

    assert!(space.emit_to(&addr, Event::new("a", Bytes::from_static(b"1"))));
    assert!(!space.emit_to(&addr, Event::new("a", Bytes::from_static(b"2"))));
    assert!(space.participants.contains_address(&addr));

    assert_eq!(rx.recv().await.expect("first").payload.as_ref(), b"1");
    assert!(space.emit_to(&addr, Event::new("a", Bytes::from_static(b"3"))));
}
