//! Banner grabbing for freshly opened TCP connections.
//!
//! Most line-oriented services (SSH, FTP, SMTP, ...) greet the client on
//! their own. Others stay silent until spoken to, so a short fixed probe
//! is sent first on ports where that is known to help.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::trace;

/// Maximum bytes read for a banner.
const MAX_BANNER_SIZE: usize = 1024;

/// Maximum characters kept after sanitizing.
const MAX_BANNER_CHARS: usize = 256;

const HTTP_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";
const REDIS_PROBE: &[u8] = b"PING\r\n";
const MEMCACHED_PROBE: &[u8] = b"version\r\n";

/// Payload to send before reading, for services that never speak first.
pub fn probe_payload(port: u16) -> Option<&'static [u8]> {
    match port {
        80 | 443 | 3000 | 5000 | 8000 | 8008 | 8080 | 8081 | 8443 | 8888 | 9000 | 9090
        | 9200 => Some(HTTP_PROBE),
        6379 => Some(REDIS_PROBE),
        11211 => Some(MEMCACHED_PROBE),
        _ => None,
    }
}

/// Read a banner from an open stream, giving up at `deadline`.
///
/// Sends `payload` first when given. Returns `None` when nothing usable
/// arrived in time; I/O errors are treated the same way.
pub async fn grab_banner(
    stream: &mut TcpStream,
    payload: Option<&[u8]>,
    deadline: Instant,
) -> Option<String> {
    if let Some(payload) = payload {
        match timeout_at(deadline, stream.write_all(payload)).await {
            Ok(Ok(())) => {}
            _ => return None,
        }
    }

    let mut buffer = vec![0u8; MAX_BANNER_SIZE];
    match timeout_at(deadline, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => sanitize_banner(&buffer[..n]),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            trace!(error = %e, "banner read failed");
            None
        }
        Err(_) => None,
    }
}

/// Keep the first non-empty line, decoded lossily, with control
/// characters replaced and length clipped.
pub fn sanitize_banner(data: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(data);
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let cleaned: String = line
        .chars()
        .take(MAX_BANNER_CHARS)
        .map(|c| if c.is_control() { '.' } else { c })
        .collect();

    Some(cleaned.trim().to_string()).filter(|s| !s.is_empty())
}
