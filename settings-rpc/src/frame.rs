//! Length-prefixed JSON framing.
//!
//! Each frame is a big-endian `u32` payload length followed by the payload.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{RpcError, RpcResult};

/// Largest payload accepted in either direction.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Writes one frame and flushes the writer.
///
/// # Errors
///
/// Returns [`RpcError::Protocol`] for oversized payloads and [`RpcError::Io`]
/// when the write fails.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> RpcResult<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(RpcError::protocol(format!(
            "frame too large: {} bytes",
            payload.len()
        )));
    }
    let len = u32::try_from(payload.len())
        .map_err(|_| RpcError::protocol("frame length exceeds u32"))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame.
///
/// # Errors
///
/// Returns [`RpcError::Protocol`] for empty or oversized frames and
/// [`RpcError::Io`] when the stream ends early.
pub async fn read_frame<R>(reader: &mut R) -> RpcResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32().await? as usize;
    if len == 0 {
        return Err(RpcError::protocol("empty frame"));
    }
    if len > MAX_FRAME_LEN {
        return Err(RpcError::protocol(format!("frame too large: {len} bytes")));
    }

    let mut payload = vec![0_u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Serializes `message` as JSON and writes it as one frame.
///
/// # Errors
///
/// See [`write_frame`]; serialization failures map to
/// [`RpcError::Serialization`].
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> RpcResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(message)?;
    write_frame(writer, &payload).await
}

/// Reads one frame and deserializes it from JSON.
///
/// # Errors
///
/// See [`read_frame`]; malformed JSON maps to [`RpcError::Serialization`].
pub async fn read_message<R, T>(reader: &mut R) -> RpcResult<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let payload = read_frame(reader).await?;
    Ok(serde_json::from_slice(&payload)?)
}
