//! Per-connection call handling.
//!
//! One accepted connection carries one call: read a request frame, route it
//! through the registry, write the reply frame, close.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};
use wire::{RequestEnvelope, ResponseEnvelope};

use crate::error::Result;
use crate::registry::Registry;

/// Serve exactly one call on `stream`.
///
/// If the request cannot be decoded the stream is closed without writing a
/// single byte, and the parse failure is returned. A failure to write the
/// reply is ignored: the caller has gone away and there is no one left to
/// tell.
pub async fn serve_connection<S>(mut stream: S, registry: &Registry) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let frame = wire::read_frame(&mut stream).await?;
    let request: RequestEnvelope = wire::decode(&frame)?;
    trace!(method = %request.method, seq = request.seq, "dispatching call");

    let response: ResponseEnvelope = registry.dispatch(&request).await?;
    let bytes = wire::encode(&response)?;

    if let Err(e) = wire::write_frame(&mut stream, &bytes).await {
        debug!(error = %e, seq = request.seq, "dropping reply, peer gone");
        return Ok(());
    }
    let _ = stream.shutdown().await;
    Ok(())
}
