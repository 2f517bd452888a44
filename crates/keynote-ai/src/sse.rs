//! Incremental decoder for the event-stream wire format.
//!
//! Frames are delimited by a blank line (`\n\n`). The transport hands us
//! byte chunks at arbitrary boundaries, including mid-delimiter and
//! mid-UTF-8 sequence, so the decoder keeps a text buffer plus a
//! pending-bytes tail across pushes.

/// Payload line prefix for meaningful frames.
pub const DATA_PREFIX: &str = "data: ";

const FRAME_DELIMITER: &str = "\n\n";

/// Stateful decoder that turns raw byte chunks into complete frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet split into frames.
    buffer: String,
    /// Trailing bytes that do not yet form a complete UTF-8 sequence.
    pending: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning every frame it completes, in
    /// arrival order. The undelimited remainder stays buffered.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.decode(bytes);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find(FRAME_DELIMITER) {
            let frame = self.buffer[..pos].to_string();
            self.buffer.drain(..pos + FRAME_DELIMITER.len());
            frames.push(frame);
        }
        frames
    }

    /// Signal end-of-stream. The residual segment is returned only if it
    /// still looks like a data frame; malformed trailing bytes are
    /// discarded silently.
    pub fn finish(mut self) -> Option<String> {
        if !self.pending.is_empty() {
            // EOF inside a UTF-8 sequence: nothing more is coming.
            self.buffer
                .push_str(&String::from_utf8_lossy(&self.pending));
        }

        let residue = self.buffer.trim();
        if residue.starts_with(DATA_PREFIX) {
            Some(residue.to_string())
        } else {
            None
        }
    }

    /// Decode as much of the input as possible. An incomplete trailing
    /// sequence is deferred to the next push; invalid interior bytes
    /// decode to U+FFFD.
    fn decode(&mut self, bytes: &[u8]) {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let mut offset = 0;
        while offset < data.len() {
            match std::str::from_utf8(&data[offset..]) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    offset = data.len();
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&data[offset..offset + valid]));
                    offset += valid;

                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push('\u{FFFD}');
                            offset += len;
                        }
                        None => {
                            self.pending = data[offset..].to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_frames_in_one_push() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: {\"chunk\":\"ab\"}\n\ndata: {\"chunk\":\"cd\"}\n\n");
        assert_eq!(
            frames,
            vec!["data: {\"chunk\":\"ab\"}", "data: {\"chunk\":\"cd\"}"]
        );
    }

    #[test]
    fn test_frames_survive_any_split_point() {
        let input: &[u8] = b"data: {\"chunk\":\"ab\"}\n\ndata: {\"chunk\":\"cd\"}\n\n";
        for split in 0..=input.len() {
            let mut decoder = FrameDecoder::new();
            let mut frames = decoder.push(&input[..split]);
            frames.extend(decoder.push(&input[split..]));
            assert_eq!(
                frames,
                vec![
                    "data: {\"chunk\":\"ab\"}".to_string(),
                    "data: {\"chunk\":\"cd\"}".to_string()
                ],
                "split at byte {}",
                split
            );
        }
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let text = "data: {\"chunk\":\"héllo\"}\n\n";
        let bytes = text.as_bytes();
        // Split one byte into the two-byte 'é' sequence.
        let split = text.find('é').unwrap() + 1;

        let mut decoder = FrameDecoder::new();
        let mut frames = decoder.push(&bytes[..split]);
        frames.extend(decoder.push(&bytes[split..]));

        assert_eq!(frames, vec!["data: {\"chunk\":\"héllo\"}"]);
        assert!(!frames[0].contains('\u{FFFD}'));
    }

    #[test]
    fn test_invalid_interior_byte_becomes_replacement_char() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: a\xFFb\n\n");
        assert_eq!(frames, vec!["data: a\u{FFFD}b"]);
    }

    #[test]
    fn test_partial_frame_stays_buffered() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: {\"chunk\":\"ab\"}").is_empty());
        let frames = decoder.push(b"\n\n");
        assert_eq!(frames, vec!["data: {\"chunk\":\"ab\"}"]);
    }

    #[test]
    fn test_finish_emits_residual_data_frame() {
        let mut decoder = FrameDecoder::new();
        assert!(
            decoder
                .push(b"data: {\"done\":true,\"answer\":\"hi\"}")
                .is_empty()
        );
        assert_eq!(
            decoder.finish().as_deref(),
            Some("data: {\"done\":true,\"answer\":\"hi\"}")
        );
    }

    #[test]
    fn test_finish_discards_non_data_residue() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b": keep-alive");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_finish_empty() {
        assert_eq!(FrameDecoder::new().finish(), None);
    }

    #[test]
    fn test_finish_flushes_pending_bytes() {
        let mut decoder = FrameDecoder::new();
        // "é" with its second byte missing at EOF.
        decoder.push(b"data: caf\xC3");
        let residue = decoder.finish().unwrap();
        assert!(residue.starts_with("data: caf"));
    }
}
