//! Node actors talking over an in-memory medium with paused tokio time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use aodv_core::message::{Message, UserData, decode};
use aodv_core::types::NodeAddress;
use aodv_node::{MemoryHub, Medium, Node, NodeError, NodeHandle, Notification, TokioClock};
use aodv_routing::{DataOutcome, ProtocolTiming};

const A: NodeAddress = NodeAddress::new(0x0001);
const B: NodeAddress = NodeAddress::new(0x0002);
const C: NodeAddress = NodeAddress::new(0x0003);

struct Running {
    handle: NodeHandle,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

async fn start(hub: &MemoryHub, station: NodeAddress, address: Option<NodeAddress>) -> Running {
    let medium = hub.attach(station).await;
    let mut node = Node::with_clock(
        ProtocolTiming::default(),
        address,
        medium,
        TokioClock::anchored_at(1_000_000),
    );
    let handle = node.handle();
    let notifications = node.take_notifications().unwrap();
    tokio::spawn(node.run());
    Running {
        handle,
        notifications,
    }
}

async fn line(hub: &MemoryHub, stations: &[NodeAddress]) -> Vec<Running> {
    for pair in stations.windows(2) {
        hub.link(pair[0], pair[1]).await;
    }
    let mut nodes = Vec::new();
    for &station in stations {
        nodes.push(start(hub, station, Some(station)).await);
    }
    nodes
}

#[tokio::test(start_paused = true)]
async fn test_data_reaches_two_hops_away() {
    aodv_node::logging::init_for_tests();
    let hub = MemoryHub::new();
    let mut nodes = line(&hub, &[A, B, C]).await;

    let outcome = nodes[0]
        .handle
        .send(UserData::new(C, &b"hello"[..]))
        .await
        .unwrap();
    assert_eq!(outcome, DataOutcome::Discovering { retries: 1 });

    match nodes[2].notifications.recv().await {
        Some(Notification::Delivered(data)) => assert_eq!(data.payload(), b"hello"),
        other => panic!("expected delivery, got {other:?}"),
    }

    let routes = nodes[0].handle.routes().await.unwrap();
    assert!(routes.starts_with("DEST"));
    assert!(routes.contains("0003"), "no route to C in:\n{routes}");

    // The route is now active, so the next send goes straight out.
    let outcome = nodes[0]
        .handle
        .send(UserData::new(C, &b"again"[..]))
        .await
        .unwrap();
    assert_eq!(outcome, DataOutcome::Forwarded { next_hop: B });
    match nodes[2].notifications.recv().await {
        Some(Notification::Delivered(data)) => assert_eq!(data.payload(), b"again"),
        other => panic!("expected delivery, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_after_backoff() {
    let hub = MemoryHub::new();
    let mut nodes = line(&hub, &[A, B]).await;
    let began = Instant::now();

    nodes[0]
        .handle
        .send(UserData::new(NodeAddress::new(0x0099), &b"anyone?"[..]))
        .await
        .unwrap();

    match nodes[0].notifications.recv().await {
        Some(Notification::Unreachable(reason)) => assert_eq!(reason, "Destination unreachable"),
        other => panic!("expected unreachable, got {other:?}"),
    }
    // 2800 + 5600 + 11200 ms of backoff with the default timing.
    let waited = began.elapsed();
    assert!(waited >= Duration::from_millis(19_600), "waited {waited:?}");
    assert!(waited < Duration::from_millis(19_700), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn test_frames_ignored_until_address_set() {
    let hub = MemoryHub::new();
    hub.link(A, B).await;
    let a = start(&hub, A, Some(A)).await;
    let mut b = start(&hub, B, None).await;

    let outcome = a.handle.send(UserData::new(B, &b"early"[..])).await.unwrap();
    assert_eq!(outcome, DataOutcome::Discovering { retries: 1 });
    b.handle.set_address(B).await.unwrap();

    // A's first request went unheard; its retry finds B.
    match b.notifications.recv().await {
        Some(Notification::Delivered(data)) => assert_eq!(data.payload(), b"early"),
        other => panic!("expected delivery, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_send_without_address_fails() {
    let hub = MemoryHub::new();
    let node = start(&hub, A, None).await;
    let err = node
        .handle
        .send(UserData::new(B, &b"x"[..]))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Router(_)));
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_stopped_after_shutdown() {
    let hub = MemoryHub::new();
    let node = start(&hub, A, Some(A)).await;
    node.handle.shutdown().await;
    // Give the actor a chance to exit.
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(matches!(node.handle.routes().await, Err(NodeError::Stopped)));
    assert!(matches!(
        node.handle.send(UserData::new(B, &b"late"[..])).await,
        Err(NodeError::Stopped)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_request_on_air_when_send_resolves() {
    let hub = MemoryHub::new();
    hub.link(A, B).await;
    let a = start(&hub, A, Some(A)).await;
    // B is a bare station with no node behind it.
    let listener = hub.attach(B).await;

    a.handle.send(UserData::new(C, &b"hi"[..])).await.unwrap();

    let datagram = tokio::time::timeout(Duration::from_millis(1), listener.receive())
        .await
        .expect("request not on the air when send resolved")
        .unwrap();
    match decode(&datagram.frame).unwrap() {
        Message::RouteRequest(request) => {
            assert_eq!(request.originator(), A);
            assert_eq!(request.destination(), C);
        }
        other => panic!("expected a route request, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_oversized_data_refused() {
    let hub = MemoryHub::new();
    let node = start(&hub, A, Some(A)).await;
    let err = node
        .handle
        .send(UserData::new(B, vec![0x41; 1100]))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::FrameTooLarge { max: 1024, .. }));

    // The node keeps working.
    assert!(node.handle.routes().await.is_ok());
}
