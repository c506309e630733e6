//! Length-prefixed framing.
//!
//! Frame format: `[length:4][payload:N]`
//!
//! - **length**: payload size in bytes (little-endian u32)
//! - **payload**: one encoded envelope
//!
//! `read_frame` consumes exactly one frame, so a short read never leaks into
//! whatever follows on the stream.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, WireError};

/// Length prefix size.
pub const HEADER_SIZE: usize = 4;

/// Maximum payload size (1MB).
///
/// Larger declared lengths are rejected before anything is allocated.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Write one frame and flush it.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_SIZE {
        return Err(WireError::FrameTooLarge {
            size: payload.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u32_le(payload.len() as u32);
    buf.put_slice(payload);

    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame and return its payload.
///
/// # Errors
///
/// - `Truncated` if the stream ends anywhere inside the frame, including
///   before the first header byte.
/// - `FrameTooLarge` if the header declares more than [`MAX_FRAME_SIZE`].
/// - `Io` for transport failures.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_SIZE];
    let have = read_full(reader, &mut header).await?;
    if have < HEADER_SIZE {
        return Err(WireError::Truncated {
            needed: HEADER_SIZE,
            have,
        });
    }

    let length = u32::from_le_bytes(header) as usize;
    if length > MAX_FRAME_SIZE {
        return Err(WireError::FrameTooLarge { size: length });
    }

    let mut payload = vec![0u8; length];
    let have = read_full(reader, &mut payload).await?;
    if have < length {
        return Err(WireError::Truncated {
            needed: length,
            have,
        });
    }
    Ok(payload)
}

/// Fill `buf` unless EOF comes first; returns the bytes read.
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
