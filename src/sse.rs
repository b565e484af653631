//! Incremental decoder for `text/event-stream` payloads.
//!
//! Both the OpenAI-compatible provider and the bundled service client read
//! SSE bodies chunk by chunk; chunks split records (and even UTF-8
//! sequences) at arbitrary byte boundaries, so the decoder buffers until a
//! full record is available.

/// Accumulates raw body bytes and yields completed `data:` payloads.
///
/// Feed each network chunk as it arrives; an event's payload is returned
/// once its terminating blank line has been seen. A trailing record whose
/// blank line never arrives is held back until [`SseDecoder::finish`].
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes. Returns the payloads of every event
    /// completed by this chunk, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut completed = Vec::new();
        // A line break is a single byte, so it can never fall inside a
        // multi-byte UTF-8 sequence; every complete line is valid text.
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..pos]);
            if let Some(payload) = self.take_line(line.trim_end_matches('\r')) {
                completed.push(payload);
            }
        }
        completed
    }

    /// Flush the trailing record, if any. Call once the body is exhausted:
    /// a final `data:` line that arrived without its blank-line terminator
    /// (or even without its newline) still decodes.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buf.is_empty() {
            let rest = String::from_utf8_lossy(&std::mem::take(&mut self.buf)).into_owned();
            if let Some(payload) = self.take_line(rest.trim_end_matches('\r')) {
                return Some(payload);
            }
        }
        self.dispatch()
    }

    /// Process one complete line; returns a payload when the line ends an event.
    fn take_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(data) = line.strip_prefix("data:") {
            // The space after the colon is optional in the SSE grammar.
            self.data_lines
                .push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        // Comment lines (":keep-alive") and other fields (event:, id:,
        // retry:) carry nothing our protocol uses.
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data_lines).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(decoder: &mut SseDecoder, input: &str) -> Vec<String> {
        decoder.feed(input.as_bytes())
    }

    #[test]
    fn test_single_record() {
        let mut d = SseDecoder::new();
        let out = feed_all(&mut d, "data: {\"type\":\"done\"}\n\n");
        assert_eq!(out, vec![r#"{"type":"done"}"#]);
    }

    #[test]
    fn test_records_split_at_arbitrary_boundaries() {
        let full = "data: {\"a\":1}\n\ndata: {\"b\":2}\n\n";
        // Every split point must reassemble to the same two payloads.
        for cut in 0..full.len() {
            let mut d = SseDecoder::new();
            let mut out = d.feed(full[..cut].as_bytes());
            out.extend(d.feed(full[cut..].as_bytes()));
            assert_eq!(out, vec![r#"{"a":1}"#, r#"{"b":2}"#], "cut at {}", cut);
        }
    }

    #[test]
    fn test_trailing_record_held_until_finish() {
        let mut d = SseDecoder::new();
        let out = feed_all(&mut d, "data: first\n\ndata: trailing\n");
        assert_eq!(out, vec!["first"]);
        assert_eq!(d.finish(), Some("trailing".into()));
        assert_eq!(d.finish(), None);
    }

    #[test]
    fn test_incomplete_final_line_still_decodes() {
        let mut d = SseDecoder::new();
        assert!(feed_all(&mut d, "data: cut-of").is_empty());
        assert!(feed_all(&mut d, "f-midway").is_empty());
        assert_eq!(d.finish(), Some("cut-off-midway".into()));
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut d = SseDecoder::new();
        let out = feed_all(&mut d, "data: payload\r\n\r\n");
        assert_eq!(out, vec!["payload"]);
    }

    #[test]
    fn test_comments_and_other_fields_ignored() {
        let mut d = SseDecoder::new();
        let out = feed_all(
            &mut d,
            ":keep-alive\nretry: 3000\nevent: message\nid: 7\ndata: real\n\n",
        );
        assert_eq!(out, vec!["real"]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut d = SseDecoder::new();
        let out = feed_all(&mut d, "data: line one\ndata: line two\n\n");
        assert_eq!(out, vec!["line one\nline two"]);
    }

    #[test]
    fn test_data_without_space_after_colon() {
        let mut d = SseDecoder::new();
        let out = feed_all(&mut d, "data:tight\n\n");
        assert_eq!(out, vec!["tight"]);
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let payload = "data: caf\u{e9} \u{2713}\n\n";
        let bytes = payload.as_bytes();
        // Split inside the two-byte 'é' sequence.
        let cut = payload.find('\u{e9}').unwrap() + 1;
        let mut d = SseDecoder::new();
        let mut out = d.feed(&bytes[..cut]);
        out.extend(d.feed(&bytes[cut..]));
        assert_eq!(out, vec!["caf\u{e9} \u{2713}"]);
    }

    #[test]
    fn test_blank_lines_without_data_yield_nothing() {
        let mut d = SseDecoder::new();
        assert!(feed_all(&mut d, "\n\n\n").is_empty());
        assert_eq!(d.finish(), None);
    }
}
