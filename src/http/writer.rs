use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.0";

/// Serializes a response to wire bytes.
///
/// The status line and headers are 7-bit ASCII; any other character is
/// written as `?`. The body is copied unchanged.
pub fn serialize_response(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(256 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    put_ascii(&mut buf, &status_line);

    // Headers
    for (k, v) in &resp.headers {
        put_ascii(&mut buf, k);
        buf.put_slice(b": ");
        put_ascii(&mut buf, v);
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    // Body
    buf.put_slice(&resp.body);

    buf.freeze()
}

fn put_ascii(buf: &mut BytesMut, text: &str) {
    for c in text.chars() {
        buf.put_u8(if c.is_ascii() { c as u8 } else { b'?' });
    }
}

pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            buffer: bytes,
            written: 0,
        }
    }

    pub async fn write_to_stream(
        &mut self,
        stream: &mut TcpStream,
    ) -> anyhow::Result<()> {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
