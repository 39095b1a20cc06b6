//! `text/event-stream` decoding
//!
//! The parser buffers raw bytes and only decodes complete lines, so a chunk
//! boundary may fall anywhere, including inside a multi-byte character.

use std::{collections::VecDeque, error::Error as StdError, pin::Pin};

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::{
    event::TransportEvent,
    source::{BoxFuture, EventSource},
};

const EVENT_CHUNK: &str = "chunk";
const EVENT_COMPLETE: &str = "complete";
const EVENT_ERROR: &str = "error";
const EVENT_MESSAGE: &str = "message";

/// One dispatched server-sent event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field; `None` means the default `message` type
    pub event_type: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// Map onto the pipeline's transport events
    ///
    /// Unnamed events are treated as chunks. Unknown event names yield `None`.
    #[must_use]
    pub fn into_transport(self) -> Option<TransportEvent> {
        match self.event_type.as_deref().unwrap_or(EVENT_MESSAGE) {
            EVENT_CHUNK | EVENT_MESSAGE => Some(TransportEvent::Chunk(self.data)),
            EVENT_COMPLETE => Some(TransportEvent::Complete),
            EVENT_ERROR => Some(TransportEvent::Error(
                (!self.data.is_empty()).then_some(self.data),
            )),
            _ => None,
        }
    }
}

/// Incremental server-sent events parser
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event_type: Option<String>,
    data: String,
    has_data: bool,
    last_event_id: Option<String>,
}

impl SseParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(8192),
            ..Self::default()
        }
    }

    /// Feed raw bytes; returns every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        let mut start = 0;
        while let Some(pos) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            let line = self.buffer[start..end]
                .strip_suffix(b"\r")
                .unwrap_or(&self.buffer[start..end]);
            let line = String::from_utf8_lossy(line).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            start = end + 1;
        }
        self.buffer.drain(..start);
        events
    }

    /// Most recent `id:` seen on the stream
    #[must_use]
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            // an empty name means the default `message` type
            "event" => self.event_type = (!value.is_empty()).then(|| value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" => self.last_event_id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        let has_data = std::mem::take(&mut self.has_data);
        let data = std::mem::take(&mut self.data);
        // named events without data still carry meaning (`complete`)
        if !has_data && event_type.is_none() {
            return None;
        }
        Some(SseEvent {
            event_type,
            data,
            id: self.last_event_id.clone(),
        })
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Box<dyn StdError + Send + Sync>>> + Send>>;

/// Event source over any byte stream carrying `text/event-stream`
pub struct SseSource {
    body: ByteStream,
    parser: SseParser,
    pending: VecDeque<TransportEvent>,
    closed: bool,
}

impl std::fmt::Debug for SseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseSource")
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl SseSource {
    pub fn new<S, E>(body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            body: Box::pin(body.map(|chunk| chunk.map_err(Into::into))),
            parser: SseParser::new(),
            pending: VecDeque::new(),
            closed: false,
        }
    }
}

impl EventSource for SseSource {
    fn next_event(&mut self) -> BoxFuture<'_, Option<TransportEvent>> {
        Box::pin(async move {
            loop {
                if self.closed {
                    return None;
                }
                if let Some(event) = self.pending.pop_front() {
                    return Some(event);
                }
                match self.body.next().await {
                    Some(Ok(bytes)) => {
                        for event in self.parser.feed(&bytes) {
                            match event.into_transport() {
                                Some(event) => self.pending.push_back(event),
                                None => log::trace!("ignoring unknown server-sent event"),
                            }
                        }
                    }
                    Some(Err(e)) => {
                        self.closed = true;
                        return Some(TransportEvent::Error(Some(e.to_string())));
                    }
                    None => return None,
                }
            }
        })
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.pending.clear();
            self.body = Box::pin(futures::stream::empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_events_and_split_lines() {
        let mut parser = SseParser::new();
        let mut events = parser.feed(b"event: chunk\nda");
        assert!(events.is_empty());
        events.extend(parser.feed(b"ta: {\"center\n\nevent: complete\ndata:\n\n"));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].clone().into_transport(),
            Some(TransportEvent::Chunk("{\"center".into()))
        );
        assert_eq!(events[1].clone().into_transport(), Some(TransportEvent::Complete));
    }

    #[test]
    fn test_empty_event_name_is_a_chunk() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event:\ndata: {}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, None);
        assert_eq!(
            events[0].clone().into_transport(),
            Some(TransportEvent::Chunk("{}".into()))
        );
    }

    #[test]
    fn test_multiline_data_crlf_and_comments() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": keep-alive\r\nevent: chunk\r\ndata: a\r\ndata: b\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "a\nb");
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut parser = SseParser::new();
        let bytes = "event: chunk\ndata: 无聊\n\n".as_bytes();
        let split = bytes.len() - 4;
        let mut events = parser.feed(&bytes[..split]);
        events.extend(parser.feed(&bytes[split..]));
        assert_eq!(events[0].data, "无聊");
    }

    #[test]
    fn test_error_event_with_and_without_reason() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: error\ndata: quota\n\nevent: error\n\n");
        assert_eq!(
            events[0].clone().into_transport(),
            Some(TransportEvent::Error(Some("quota".into())))
        );
        assert_eq!(events[1].clone().into_transport(), Some(TransportEvent::Error(None)));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let event = SseEvent {
            event_type: Some("ping".into()),
            ..SseEvent::default()
        };
        assert_eq!(event.into_transport(), None);
    }

    #[tokio::test]
    async fn test_source_over_byte_stream() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"event: chunk\ndata: {}\n")),
            Ok(Bytes::from_static(b"\nevent: complete\ndata: \n\n")),
        ];
        let mut source = SseSource::new(futures::stream::iter(chunks));
        assert_eq!(source.next_event().await, Some(TransportEvent::Chunk("{}".into())));
        assert_eq!(source.next_event().await, Some(TransportEvent::Complete));
        assert_eq!(source.next_event().await, None);
    }

    #[tokio::test]
    async fn test_body_error_becomes_transport_error() {
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Err(std::io::Error::other("reset"))];
        let mut source = SseSource::new(futures::stream::iter(chunks));
        assert!(matches!(
            source.next_event().await,
            Some(TransportEvent::Error(Some(reason))) if reason.contains("reset")
        ));
        assert_eq!(source.next_event().await, None);
    }
}
