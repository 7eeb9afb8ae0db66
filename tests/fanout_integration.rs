//! End-to-end fan-out scenarios through the hub, queue, dispatcher, and
//! registry, with per-connection channels standing in for client sockets.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use note_relay::adapters::websocket::{
    ConnectionHandle, ConnectionId, NoteHub, ServerMessage,
};
use note_relay::domain::{Note, NoteId, UserId};

fn principal() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

async fn attach(hub: &NoteHub, principal: UserId) -> (ConnectionId, mpsc::Receiver<ServerMessage>) {
    let (tx, rx) = mpsc::channel(8);
    let id = ConnectionId::new();
    hub.registry()
        .register(ConnectionHandle {
            id,
            principal,
            sender: tx,
        })
        .await;
    (id, rx)
}

async fn recv(rx: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("connection channel closed")
}

/// A note create commits for a user with two open connections: both receive
/// the changed note and then the list snapshot, in that order, and nobody
/// else receives anything.
#[tokio::test]
async fn create_fans_out_to_both_connections_in_order() {
    let (hub, dispatcher) = NoteHub::new(16);
    let p1 = principal();
    let p2 = principal();
    let (_c1, mut rx1) = attach(&hub, p1).await;
    let (_c2, mut rx2) = attach(&hub, p1).await;
    let (_c3, mut other_rx) = attach(&hub, p2).await;
    tokio::spawn(dispatcher.run());

    let note = Note::new(p1, "A", "");
    let items = vec![note.summary()];
    hub.note_mutated(p1, note.clone(), items).await.unwrap();

    for rx in [&mut rx1, &mut rx2] {
        match recv(rx).await {
            ServerMessage::NoteUpdate(received) => assert_eq!(received.id, note.id),
            other => panic!("expected noteUpdate first, got {other:?}"),
        }
        match recv(rx).await {
            ServerMessage::NoteList(items) => assert_eq!(items.len(), 1),
            other => panic!("expected noteList second, got {other:?}"),
        }
    }
    assert!(other_rx.try_recv().is_err());
}

/// A delete commits for a user with zero open connections: the events are
/// submitted successfully and silently dropped.
#[tokio::test]
async fn delete_for_offline_user_is_dropped_without_error() {
    let (hub, dispatcher) = NoteHub::new(16);
    let offline = principal();
    let online = principal();
    let (_c, mut rx) = attach(&hub, online).await;
    tokio::spawn(dispatcher.run());

    hub.note_deleted(offline, NoteId::new(), Vec::new())
        .await
        .expect("publishing to an offline user must not fail");

    // The dispatcher is still serving everyone else.
    hub.note_mutated(online, Note::new(online, "after", ""), Vec::new())
        .await
        .unwrap();
    assert!(matches!(recv(&mut rx).await, ServerMessage::NoteUpdate(_)));
}

/// A connection dies mid-delivery: the write failure removes only that
/// connection, the survivor still gets the event, and the handler's own
/// cleanup racing in afterwards is a harmless no-op.
#[tokio::test]
async fn mid_delivery_disconnect_is_isolated() {
    let (hub, dispatcher) = NoteHub::new(16);
    let user = principal();
    let (dead_id, dead_rx) = attach(&hub, user).await;
    let (live_id, mut live_rx) = attach(&hub, user).await;
    drop(dead_rx); // The network killed this one.
    tokio::spawn(dispatcher.run());

    hub.note_mutated(user, Note::new(user, "survives", ""), Vec::new())
        .await
        .unwrap();

    assert!(matches!(recv(&mut live_rx).await, ServerMessage::NoteUpdate(_)));
    assert!(matches!(recv(&mut live_rx).await, ServerMessage::NoteList(_)));

    // Wait for the dispatcher's removal of the failed connection to land.
    timeout(Duration::from_secs(1), async {
        while hub.registry().connection_count(&user).await != 1 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("failed connection was not removed");

    // The handler's unregister after its read loop ends.
    hub.registry().unregister(&dead_id).await;

    let remaining = hub.registry().connections_for(&user).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, live_id);

    // Later events still flow.
    hub.note_deleted(user, NoteId::new(), Vec::new()).await.unwrap();
    assert!(matches!(recv(&mut live_rx).await, ServerMessage::NoteDelete(_)));
}

/// Events submitted by different producers are delivered in submission
/// order, globally.
#[tokio::test]
async fn submission_order_is_preserved_across_producers() {
    let (hub, dispatcher) = NoteHub::new(16);
    let user = principal();
    let (_c, mut rx) = attach(&hub, user).await;
    tokio::spawn(dispatcher.run());

    let producer_a = hub.clone();
    let producer_b = hub.clone();
    for (producer, title) in [
        (&producer_a, "e1"),
        (&producer_b, "e2"),
        (&producer_a, "e3"),
        (&producer_b, "e4"),
    ] {
        producer
            .note_mutated(user, Note::new(user, title, ""), Vec::new())
            .await
            .unwrap();
    }

    let mut titles = Vec::new();
    while titles.len() < 4 {
        if let ServerMessage::NoteUpdate(note) = recv(&mut rx).await {
            titles.push(note.title);
        }
    }
    assert_eq!(titles, ["e1", "e2", "e3", "e4"]);
}
