//! End-to-end tests over real TCP sockets.
//!
//! # Test Strategy
//!
//! 1. **Basic call**: one node pings another and gets the greeting back
//! 2. **Concurrency**: parallel callers each get their own answer
//! 3. **Failures**: dial errors, corrupt requests, unknown methods, timeouts
//! 4. **Startup**: binding an occupied port fails

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use corelib::{Node, NodeId, PeerAddress};
use rpc::{ListenHandle, PingService, Registry, RpcError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wire::{PingRequest, PingResponse};

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

async fn start_node(id: i64) -> ListenHandle {
    let registry = Registry::builder()
        .register(PingService::new(Node::new(id)))
        .build();
    rpc::start(loopback(), Arc::new(registry)).await.unwrap()
}

fn peer_of(handle: &ListenHandle) -> PeerAddress {
    PeerAddress::new("127.0.0.1", handle.local_addr().port())
}

// ============================================================================
// Basic Call Tests
// ============================================================================

#[tokio::test]
async fn test_node_two_pings_node_one() {
    let node_one = start_node(1).await;

    let reply = rpc::ping(&peer_of(&node_one), NodeId(2), None).await.unwrap();
    assert_eq!(reply.message, "Hello 2, I am Node 1 and I am alive!");

    node_one.abort();
}

#[tokio::test]
async fn test_reply_names_sender_and_server() {
    let server = start_node(40).await;

    let reply = rpc::ping(&peer_of(&server), NodeId(17), None).await.unwrap();
    assert!(reply.message.contains("17"));
    assert!(reply.message.contains("40"));

    server.abort();
}

#[tokio::test]
async fn test_each_call_uses_a_fresh_connection() {
    let server = start_node(1).await;
    let peer = peer_of(&server);

    for sender in 0..5 {
        let reply = rpc::ping(&peer, NodeId(sender), None).await.unwrap();
        assert_eq!(
            reply.message,
            format!("Hello {}, I am Node 1 and I am alive!", sender)
        );
    }

    server.abort();
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_do_not_cross_talk() {
    let server = start_node(9).await;
    let peer = peer_of(&server);

    let calls: Vec<_> = (100..132)
        .map(|sender| {
            let peer = peer.clone();
            tokio::spawn(async move { (sender, rpc::ping(&peer, NodeId(sender), None).await) })
        })
        .collect();

    for call in calls {
        let (sender, reply) = call.await.unwrap();
        assert_eq!(
            reply.unwrap().message,
            format!("Hello {}, I am Node 9 and I am alive!", sender)
        );
    }

    server.abort();
}

#[tokio::test]
async fn test_stalled_caller_does_not_block_others() {
    let server = start_node(5).await;

    // Connect and send nothing; this connection's handler waits forever.
    let _stalled = TcpStream::connect(server.local_addr()).await.unwrap();

    let reply = rpc::ping(&peer_of(&server), NodeId(6), Some(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(reply.message, "Hello 6, I am Node 5 and I am alive!");

    server.abort();
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_no_listener_is_a_dial_error() {
    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind(loopback()).await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let started = Instant::now();
    let err = rpc::ping(&PeerAddress::new("127.0.0.1", port), NodeId(1), None)
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Dial { .. }), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_corrupt_request_closes_without_reply() {
    let server = start_node(1).await;
    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();

    // A valid frame whose payload is not an envelope.
    stream.write_all(&3u32.to_le_bytes()).await.unwrap();
    stream.write_all(&[1, 2, 3]).await.unwrap();

    let mut received = Vec::new();
    stream.read_to_end(&mut received).await.unwrap();
    assert!(received.is_empty());

    server.abort();
}

#[tokio::test]
async fn test_truncated_request_closes_without_reply() {
    let server = start_node(1).await;
    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();

    // Declares 64 bytes, sends 2, then half-closes.
    stream.write_all(&64u32.to_le_bytes()).await.unwrap();
    stream.write_all(&[0, 0]).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut received = Vec::new();
    stream.read_to_end(&mut received).await.unwrap();
    assert!(received.is_empty());

    // The acceptor is unaffected.
    let reply = rpc::ping(&peer_of(&server), NodeId(2), None).await.unwrap();
    assert_eq!(reply.message, "Hello 2, I am Node 1 and I am alive!");

    server.abort();
}

#[tokio::test]
async fn test_unknown_method_is_a_remote_error() {
    let server = start_node(1).await;

    let err = rpc::invoke::<_, PingResponse>(
        &peer_of(&server),
        "Node.Shutdown",
        &PingRequest {
            sender_id: NodeId(2),
        },
        None,
    )
    .await
    .unwrap_err();

    match err {
        RpcError::Remote(message) => assert!(message.contains("Node.Shutdown")),
        other => panic!("expected remote error, got {:?}", other),
    }

    server.abort();
}

#[tokio::test]
async fn test_silent_peer_times_out() {
    // Accepts connections but never answers.
    let silent = TcpListener::bind(loopback()).await.unwrap();
    let port = silent.local_addr().unwrap().port();
    let hold = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = silent.accept().await {
            held.push(stream);
        }
    });

    let limit = Duration::from_millis(200);
    let err = rpc::ping(&PeerAddress::new("127.0.0.1", port), NodeId(1), Some(limit))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Timeout(d) if d == limit));

    hold.abort();
}

#[tokio::test]
async fn test_peer_closing_without_reply_is_malformed() {
    let mute = TcpListener::bind(loopback()).await.unwrap();
    let port = mute.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (mut stream, _) = mute.accept().await.unwrap();
        let _ = wire::read_frame(&mut stream).await;
        // Drop without answering.
    });

    let err = rpc::ping(&PeerAddress::new("127.0.0.1", port), NodeId(1), None)
        .await
        .unwrap_err();
    assert!(err.is_malformed(), "got {:?}", err);

    server.await.unwrap();
}

// ============================================================================
// Startup Tests
// ============================================================================

#[tokio::test]
async fn test_bind_on_occupied_port_fails() {
    let first = start_node(1).await;

    let registry = Arc::new(Registry::builder().build());
    let err = rpc::start(first.local_addr(), registry).await.unwrap_err();
    assert!(matches!(err, RpcError::Bind { .. }), "got {:?}", err);

    first.abort();
}
