//! Message transports for the MCP server.
//!
//! Two implementations: [`StdioTransport`] carries newline-delimited JSON
//! over the process stdin/stdout, which is how MCP hosts launch this server,
//! and [`ChannelTransport`] runs the same framing over in-process channels
//! for tests.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::mpsc;

use crate::error::McpError;

/// Framed JSON-RPC message exchange over some byte or channel medium.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read the next message.
    ///
    /// `Ok(None)` means EOF, the remote side closed its end and the server
    /// should shut down cleanly.
    async fn read_message(&mut self) -> Result<Option<String>, McpError>;

    /// Write one message, including framing and flushing.
    async fn write_message(&mut self, message: &str) -> Result<(), McpError>;

    /// Flush and release the transport.
    async fn close(&mut self) -> Result<(), McpError>;
}

// ---------------------------------------------------------------------------
// StdioTransport
// ---------------------------------------------------------------------------

/// NDJSON over stdin/stdout, one JSON-RPC message per line.
///
/// Stdout belongs to the protocol exclusively; anything else the process
/// wants to say (logs, diagnostics) must go to stderr or a file.
pub struct StdioTransport {
    reader: BufReader<Stdin>,
    writer: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
        // Drop the trailing newline, and the \r on CRLF hosts.
        Ok(Some(line.trim_end().to_string()))
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.writer.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChannelTransport
// ---------------------------------------------------------------------------

/// In-process transport over tokio mpsc channels.
///
/// Lets tests drive the full message loop without touching real stdio or
/// spawning a subprocess.
pub struct ChannelTransport {
    receiver: mpsc::Receiver<String>,
    sender: mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Build from explicit channel halves: `receiver` is the read side,
    /// `sender` the write side.
    pub fn new(receiver: mpsc::Receiver<String>, sender: mpsc::Sender<String>) -> Self {
        Self { receiver, sender }
    }

    /// A linked pair: what one side writes, the other reads.
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::channel(buffer);
        let (tx_b, rx_b) = mpsc::channel(buffer);
        (
            ChannelTransport::new(rx_a, tx_b),
            ChannelTransport::new(rx_b, tx_a),
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        // All senders dropped reads as EOF.
        Ok(self.receiver.recv().await)
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.sender
            .send(message.to_string())
            .await
            .map_err(|e| McpError::TransportError {
                message: format!("channel send failed: {e}"),
            })
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.receiver.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_pair_round_trips_messages() {
        let (mut client, mut server) = ChannelTransport::pair(16);

        client
            .write_message(r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#)
            .await
            .unwrap();
        let received = server.read_message().await.unwrap();
        assert_eq!(
            received.as_deref(),
            Some(r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#)
        );

        server
            .write_message(r#"{"jsonrpc":"2.0","result":{},"id":1}"#)
            .await
            .unwrap();
        let response = client.read_message().await.unwrap();
        assert_eq!(
            response.as_deref(),
            Some(r#"{"jsonrpc":"2.0","result":{},"id":1}"#)
        );
    }

    #[tokio::test]
    async fn channel_preserves_message_order() {
        let (mut client, mut server) = ChannelTransport::pair(16);
        for i in 0..5 {
            client.write_message(&format!("msg-{i}")).await.unwrap();
        }
        for i in 0..5 {
            let received = server.read_message().await.unwrap();
            assert_eq!(received, Some(format!("msg-{i}")));
        }
    }

    #[tokio::test]
    async fn dropped_sender_reads_as_eof() {
        let (tx, rx) = mpsc::channel::<String>(4);
        let (out_tx, _out_rx) = mpsc::channel::<String>(4);
        let mut transport = ChannelTransport::new(rx, out_tx);

        drop(tx);
        assert_eq!(transport.read_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_after_peer_drop_is_a_transport_error() {
        let (_tx, rx) = mpsc::channel::<String>(4);
        let (out_tx, out_rx) = mpsc::channel::<String>(4);
        let mut transport = ChannelTransport::new(rx, out_tx);

        drop(out_rx);
        let err = transport.write_message("hello").await.unwrap_err();
        assert!(matches!(err, McpError::TransportError { .. }));
    }
}
