//! Transport layer for MCP JSON-RPC communication.
//!
//! MCP uses newline-delimited JSON over stdin/stdout. Stdout carries nothing
//! but protocol messages; logs go to stderr.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// Message that can be received from the client.
#[derive(Debug)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    /// A line that is neither a request nor a notification.
    Malformed(String),
}

/// Transport for reading/writing JSON-RPC messages.
pub struct StdioTransport {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
}

impl StdioTransport {
    /// Create a transport using stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Create a transport with custom reader/writer.
    pub fn new(reader: Box<dyn BufRead + Send>, writer: Box<dyn Write + Send>) -> Self {
        Self { reader, writer }
    }

    /// Read the next message, skipping blank lines. `Ok(None)` means EOF.
    ///
    /// Lines that are not valid UTF-8 come back as `Malformed`; only
    /// reader failures are errors.
    pub fn read_message(&mut self) -> io::Result<Option<IncomingMessage>> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(None);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Received a line that is not valid UTF-8");
                    return Ok(Some(IncomingMessage::Malformed(e.to_string())));
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            tracing::debug!("Received: {}", trimmed);
            return Ok(Some(parse_message(trimmed)));
        }
    }

    /// Write a JSON-RPC response to the transport.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        self.write_line(response)
    }

    fn write_line<T: Serialize>(&mut self, message: &T) -> io::Result<()> {
        let json = serde_json::to_string(message).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Serialization error: {}", e))
        })?;

        tracing::debug!("Sending: {}", json);

        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }
}

fn parse_message(line: &str) -> IncomingMessage {
    // Requests carry an id; try them first.
    if let Ok(request) = serde_json::from_str::<JsonRpcRequest>(line) {
        return IncomingMessage::Request(request);
    }

    match serde_json::from_str::<JsonRpcNotification>(line) {
        Ok(notification) => IncomingMessage::Notification(notification),
        Err(e) => {
            tracing::warn!("Failed to parse message: {}", line);
            IncomingMessage::Malformed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use crate::test_support::SharedBuffer;
    use std::io::Cursor;

    fn transport_for(input: &str) -> StdioTransport {
        StdioTransport::new(
            Box::new(Cursor::new(input.to_string())),
            Box::new(io::sink()),
        )
    }

    #[test]
    fn test_read_request() {
        let mut transport =
            transport_for("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n");

        match transport.read_message().unwrap() {
            Some(IncomingMessage::Request(req)) => {
                assert_eq!(req.method, "tools/list");
                assert_eq!(req.id, RequestId::Number(1));
            }
            other => panic!("Expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_read_notification() {
        let mut transport =
            transport_for("{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n");

        match transport.read_message().unwrap() {
            Some(IncomingMessage::Notification(notif)) => {
                assert_eq!(notif.method, "notifications/initialized");
            }
            other => panic!("Expected notification, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut transport =
            transport_for("\n   \n{\"jsonrpc\":\"2.0\",\"id\":\"a\",\"method\":\"ping\"}\n");

        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Request(_))
        ));
        assert!(transport.read_message().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line() {
        let mut transport = transport_for("this is not json\n");

        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let input =
            b"\xff\xfe garbage\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n".to_vec();
        let mut transport =
            StdioTransport::new(Box::new(Cursor::new(input)), Box::new(io::sink()));

        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Malformed(_))
        ));
        assert!(matches!(
            transport.read_message().unwrap(),
            Some(IncomingMessage::Request(_))
        ));
        assert!(transport.read_message().unwrap().is_none());
    }

    #[test]
    fn test_write_response() {
        let buffer = SharedBuffer::default();
        let mut transport = StdioTransport::new(
            Box::new(Cursor::new(Vec::new())),
            Box::new(buffer.clone()),
        );

        transport
            .write_response(&JsonRpcResponse::success(
                RequestId::Number(1),
                serde_json::json!({}),
            ))
            .unwrap();

        let output = buffer.contents();
        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"id\":1"));
    }

    #[test]
    fn test_read_eof() {
        let mut transport = transport_for("");
        assert!(transport.read_message().unwrap().is_none());
    }
}
