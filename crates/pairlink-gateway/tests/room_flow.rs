//! End-to-end signaling flows over an in-memory hub.
//!
//! Sessions are driven directly (no sockets); outbound frames land in each
//! peer's bounded queue exactly as the transport would see them.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use pairlink_core::protocol::{ClientEvent, ConnectionId};
use pairlink_gateway::signaling::{SignalingHub, SignalingSession};

struct Peer {
    session: SignalingSession,
    rx: mpsc::Receiver<Message>,
}

fn connect(hub: &Arc<SignalingHub>) -> Peer {
    let id = ConnectionId::new();
    let (tx, rx) = mpsc::channel(16);
    hub.register(id, tx);
    Peer {
        session: SignalingSession::new(id, Arc::clone(hub)),
        rx,
    }
}

/// Join two fresh peers into `room` and drain the setup traffic
/// (creator: created/join/ready, joiner: joined/ready).
fn pair(hub: &Arc<SignalingHub>, room: &str) -> (Peer, Peer) {
    let mut a = connect(hub);
    let mut b = connect(hub);
    a.send(&format!(r#"{{"event":"create-or-join","room":"{room}"}}"#));
    b.send(&format!(r#"{{"event":"create-or-join","room":"{room}"}}"#));
    for _ in 0..3 {
        a.recv();
    }
    for _ in 0..2 {
        b.recv();
    }
    (a, b)
}

impl Peer {
    fn id(&self) -> ConnectionId {
        self.session.id()
    }

    fn send(&self, json: &str) {
        self.session.handle(ClientEvent::parse(json).unwrap());
    }

    fn recv(&mut self) -> serde_json::Value {
        match self.rx.try_recv().expect("expected an outbound event") {
            Message::Text(s) => serde_json::from_str(&s).unwrap(),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    fn assert_idle(&mut self) {
        assert!(self.rx.try_recv().is_err(), "expected no outbound events");
    }
}

#[test]
fn join_sequencing() {
    let hub = Arc::new(SignalingHub::new());
    let mut a = connect(&hub);

    a.send(r#"{"event":"create-or-join","room":"x"}"#);
    let ev = a.recv();
    assert_eq!(ev["event"], "created");
    assert_eq!(ev["room"], "x");
    assert_eq!(ev["connection"], a.id().to_string());
    a.assert_idle();

    let mut b = connect(&hub);
    b.send(r#"{"event":"create-or-join","room":"x"}"#);

    let ev = a.recv();
    assert_eq!(ev["event"], "join");
    assert_eq!(ev["room"], "x");

    let ev = b.recv();
    assert_eq!(ev["event"], "joined");
    assert_eq!(ev["connection"], b.id().to_string());

    assert_eq!(a.recv()["event"], "ready");
    assert_eq!(b.recv()["event"], "ready");
    a.assert_idle();
    b.assert_idle();
}

#[test]
fn third_peer_is_rejected() {
    let hub = Arc::new(SignalingHub::new());
    let (mut a, mut b) = pair(&hub, "x");
    let mut c = connect(&hub);

    c.send(r#"{"event":"create-or-join","room":"x"}"#);

    let ev = c.recv();
    assert_eq!(ev["event"], "full");
    assert_eq!(ev["room"], "x");
    c.assert_idle();

    assert_eq!(hub.rooms().occupants("x"), vec![a.id(), b.id()]);
    // The rejection must not reach the occupants.
    a.assert_idle();
    b.assert_idle();
}

#[test]
fn leave_symmetry() {
    let hub = Arc::new(SignalingHub::new());
    let (a, b) = pair(&hub, "x");

    a.send(r#"{"event":"leave-room","room":"x"}"#);
    assert_eq!(hub.rooms().occupants("x"), vec![b.id()]);
    assert!(hub.rooms().room_of(&a.id()).is_none());

    b.send(r#"{"event":"leave-room","room":"x"}"#);
    assert!(!hub.rooms().contains_room("x"));
}

#[test]
fn disconnect_equals_leave() {
    let hub = Arc::new(SignalingHub::new());
    let (a, b) = pair(&hub, "x");

    a.session.disconnect();
    hub.unregister(&a.id());

    assert_eq!(hub.rooms().occupants("x"), vec![b.id()]);
    assert!(hub.rooms().room_of(&a.id()).is_none());

    b.session.disconnect();
    assert!(!hub.rooms().contains_room("x"));
}

#[test]
fn relay_fidelity() {
    let hub = Arc::new(SignalingHub::new());
    let (mut a, mut b) = pair(&hub, "x");

    a.send(r#"{"event":"message","room":"x","payload":{"type":"offer","sdp":"v=0\r\n"}}"#);

    let ev = b.recv();
    assert_eq!(ev["event"], "message");
    assert_eq!(ev["payload"]["type"], "offer");
    assert_eq!(ev["payload"]["sdp"], "v=0\r\n");

    // Never echoed back to the sender.
    a.assert_idle();
    b.assert_idle();
}

#[test]
fn call_events_reach_only_the_peer() {
    let hub = Arc::new(SignalingHub::new());
    let (mut a, mut b) = pair(&hub, "x");

    a.send(r#"{"event":"call-initiated","room":"x","name":"alice"}"#);
    let ev = b.recv();
    assert_eq!(ev["event"], "call-initiated");
    assert_eq!(ev["name"], "alice");
    a.assert_idle();

    b.send(r#"{"event":"call-accepted","room":"x","name":"bob"}"#);
    let ev = a.recv();
    assert_eq!(ev["event"], "call-accepted");
    assert_eq!(ev["name"], "bob");
    b.assert_idle();
}

#[test]
fn call_rejected_clears_the_peer_only() {
    let hub = Arc::new(SignalingHub::new());
    let (a, mut b) = pair(&hub, "x");

    a.send(r#"{"event":"call-rejected","room":"x"}"#);

    let ev = b.recv();
    assert_eq!(ev["event"], "call-rejected");
    assert_eq!(ev["room"], "x");

    // The peer is out, the rejecter stays.
    assert_eq!(hub.rooms().occupants("x"), vec![a.id()]);
    assert!(hub.rooms().room_of(&b.id()).is_none());

    // The forced-out peer can start a fresh pairing.
    b.send(r#"{"event":"create-or-join","room":"y"}"#);
    assert_eq!(b.recv()["event"], "created");
}

#[test]
fn join_while_joined_is_ignored() {
    let hub = Arc::new(SignalingHub::new());
    let mut a = connect(&hub);

    a.send(r#"{"event":"create-or-join","room":"x"}"#);
    a.recv();

    a.send(r#"{"event":"create-or-join","room":"y"}"#);
    a.assert_idle();
    assert!(!hub.rooms().contains_room("y"));
    assert_eq!(hub.rooms().room_of(&a.id()).as_deref(), Some("x"));
}

#[test]
fn empty_room_name_is_ignored() {
    let hub = Arc::new(SignalingHub::new());
    let mut a = connect(&hub);

    a.send(r#"{"event":"create-or-join","room":""}"#);
    a.assert_idle();
    assert!(hub.rooms().room_of(&a.id()).is_none());
}

#[test]
fn events_while_unjoined_are_ignored() {
    let hub = Arc::new(SignalingHub::new());
    let (mut a, mut b) = pair(&hub, "x");
    let mut c = connect(&hub);

    // c never joined "x"; nothing may reach the occupants.
    c.send(r#"{"event":"message","room":"x","payload":"hello"}"#);
    c.send(r#"{"event":"call-rejected","room":"x"}"#);
    c.send(r#"{"event":"leave-room","room":"x"}"#);

    a.assert_idle();
    b.assert_idle();
    c.assert_idle();
    assert_eq!(hub.rooms().occupants("x"), vec![a.id(), b.id()]);
}

#[test]
fn message_for_foreign_room_is_ignored() {
    let hub = Arc::new(SignalingHub::new());
    let (mut a, mut b) = pair(&hub, "x");
    let mut d = connect(&hub);

    d.send(r#"{"event":"create-or-join","room":"other"}"#);
    d.recv();

    // d is joined, but not to "x".
    d.send(r#"{"event":"message","room":"x","payload":"hi"}"#);
    a.assert_idle();
    b.assert_idle();
    d.assert_idle();
}

#[test]
fn room_is_reusable_after_teardown() {
    let hub = Arc::new(SignalingHub::new());
    let (a, mut b) = pair(&hub, "x");

    a.send(r#"{"event":"leave-room","room":"x"}"#);
    b.send(r#"{"event":"leave-room","room":"x"}"#);

    // A fresh pairing in the same room starts from "created" again.
    b.send(r#"{"event":"create-or-join","room":"x"}"#);
    let ev = b.recv();
    assert_eq!(ev["event"], "created");
    assert_eq!(hub.rooms().occupants("x"), vec![b.id()]);
}
