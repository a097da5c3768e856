//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks, so lines are buffered until a line
//! terminator (`\r\n`, `\n` or a lone `\r`) is seen. An event is
//! dispatched on a blank line; comment lines (`:` prefix, used for
//! keep-alives) are skipped.

use bytes::BytesMut;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// Value of the `event:` field, if any.
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`.
    pub data: String,
    /// Last seen `id:` field.
    pub id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: BytesMut,
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
    /// The previous line ended in `\r`; a leading `\n` belongs to it.
    skip_lf: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the response body and return every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        loop {
            if self.skip_lf && !self.buf.is_empty() {
                if self.buf[0] == b'\n' {
                    let _ = self.buf.split_to(1);
                }
                self.skip_lf = false;
            }
            let Some(pos) = self.buf.iter().position(|b| matches!(*b, b'\r' | b'\n')) else {
                break;
            };
            let raw = self.buf.split_to(pos + 1);
            self.skip_lf = raw[pos] == b'\r';
            let line = String::from_utf8_lossy(&raw[..pos]);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
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
            "data" => self.data.push(value.to_owned()),
            "event" => self.event = Some(value.to_owned()),
            "id" => self.last_id = Some(value.to_owned()),
            // `retry` and unknown fields are ignored.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.join("\n");
        self.data.clear();
        Some(SseEvent {
            event,
            data,
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data:{\"a\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: hel").is_empty());
        assert!(decoder.feed(b"lo\r\n").is_empty());
        let events = decoder.feed(b"\r\ndata: next\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello");
        assert_eq!(decoder.feed(b"\n")[0].data, "next");
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b":\n\n: keep-alive\n\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_multiline_data_and_fields() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"event: order\nid: 7\ndata: one\ndata: two\nretry: 10\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: Some("order".into()),
                data: "one\ntwo".into(),
                id: Some("7".into()),
            }]
        );
    }

    #[test]
    fn test_event_without_data_is_not_dispatched() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: ping\n\n").is_empty());
        // The event name does not leak into the next event.
        let events = decoder.feed(b"data: y\n\n");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn test_bare_carriage_return_ends_lines() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: one\r\rdata: two\r\r");
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["one", "two"]);
    }

    #[test]
    fn test_crlf_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: one\r").is_empty());
        // The `\n` completes the previous terminator, not a blank line.
        assert!(decoder.feed(b"\n").is_empty());
        assert!(decoder.feed(b"data: two\r").is_empty());
        let events = decoder.feed(b"\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "one\ntwo");
    }
}
