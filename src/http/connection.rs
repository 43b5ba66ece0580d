use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::content::ContentSources;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::{Request, ServerInfo};
use crate::http::writer::ResponseWriter;
use crate::pipeline::HttpResponse;

/// Cap on buffered request bytes, headers and body together.
const MAX_REQUEST: usize = 1024 * 1024;

pub struct Connection {
    stream: TcpStream,
    buffer: Vec<u8>,
    state: ConnectionState,
    server: ServerInfo,
    sources: ContentSources,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, server: ServerInfo, sources: ContentSources) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            server,
            sources,
        }
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(mut req) => {
                            req.server = self.server.clone();
                            ConnectionState::Processing(req)
                        }
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let bytes = Self::handle_request(req, self.sources.clone()).await?;
                    self.state = ConnectionState::Writing(ResponseWriter::new(bytes));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // HTTP/1.0: one response per connection
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Err(anyhow::anyhow!("HTTP parse error: {:?}", e));
                }
            }

            if self.buffer.len() > MAX_REQUEST {
                anyhow::bail!("Request too large");
            }

            let mut temp = [0u8; 1024];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    /// Runs the pipeline off the async workers; it may block on a nested
    /// PDF round trip.
    async fn handle_request(req: Request, sources: ContentSources) -> anyhow::Result<bytes::Bytes> {
        tracing::info!(method = ?req.method, url = %req.full_url, "Request");
        let response = tokio::task::spawn_blocking(move || HttpResponse::new(&req, &sources)).await?;
        Ok(response.into_bytes())
    }
}
