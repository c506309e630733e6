//! Call invoker.
//!
//! Opens a fresh connection per call, sends one request, waits for the
//! matching reply. No retries: a failed call is reported and abandoned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use corelib::{NodeId, PeerAddress};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;
use wire::{PingRequest, PingResponse, RequestEnvelope, ResponseEnvelope, PING_METHOD};

use crate::error::{Result, RpcError};

static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Call `method` on the node at `addr`.
///
/// With `timeout` set the whole call (dial, send, receive) is bounded;
/// otherwise an unresponsive peer blocks the caller indefinitely.
///
/// # Errors
///
/// - `Dial` if no connection could be made
/// - `Malformed` if the reply does not decode or answers a different call
/// - `Remote` if the peer reported an error
/// - `Timeout` if the deadline passed
/// - `Io` if the connection broke mid-call
pub async fn invoke<Req, Resp>(
    addr: &PeerAddress,
    method: &str,
    request: &Req,
    timeout: Option<Duration>,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let body = wire::encode(request)?;
    let envelope = RequestEnvelope::new(method, NEXT_SEQ.fetch_add(1, Ordering::Relaxed), body);

    let reply = match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange(addr, &envelope))
            .await
            .map_err(|_| RpcError::Timeout(limit))??,
        None => exchange(addr, &envelope).await?,
    };

    if !reply.answers(&envelope) {
        return Err(RpcError::malformed(format!(
            "reply for {}#{} does not match call {}#{}",
            reply.method, reply.seq, envelope.method, envelope.seq
        )));
    }
    if let Some(error) = reply.error {
        return Err(RpcError::Remote(error));
    }
    Ok(wire::decode(&reply.body)?)
}

/// Probe the node at `addr` on behalf of `sender_id`.
pub async fn ping(
    addr: &PeerAddress,
    sender_id: NodeId,
    timeout: Option<Duration>,
) -> Result<PingResponse> {
    invoke(addr, PING_METHOD, &PingRequest { sender_id }, timeout).await
}

/// One request/reply on a dedicated connection. The stream is dropped on
/// every return path.
async fn exchange(addr: &PeerAddress, request: &RequestEnvelope) -> Result<ResponseEnvelope> {
    let target = addr.to_string();
    let mut stream = TcpStream::connect(target.as_str())
        .await
        .map_err(|source| RpcError::Dial {
            addr: target.clone(),
            source,
        })?;
    debug!(peer = %target, method = %request.method, seq = request.seq, "calling");

    wire::write_frame(&mut stream, &wire::encode(request)?).await?;
    let frame = wire::read_frame(&mut stream).await?;
    let reply = wire::decode(&frame)?;

    let _ = stream.shutdown().await;
    Ok(reply)
}
