/// Splits a server-sent event body into `data:` payloads.
///
/// Bytes may arrive cut at any point; only complete lines are decoded.
/// `data: [DONE]` ends the stream and later input is ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

const DONE_MARKER: &str = "[DONE]";

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        if self.done {
            return payloads;
        }

        self.buffer.extend_from_slice(bytes);
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            self.decode_line(&line, &mut payloads);
        }
        payloads
    }

    /// Decode whatever is left once the body has ended
    pub fn finish(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        let rest = std::mem::take(&mut self.buffer);
        if !rest.is_empty() {
            self.decode_line(&rest, &mut payloads);
        }
        self.done = true;
        payloads
    }

    pub fn close(&mut self) {
        self.buffer.clear();
        self.done = true;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn decode_line(&mut self, raw: &[u8], payloads: &mut Vec<String>) {
        if self.done {
            return;
        }

        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);
        // event:, id:, retry:, comments and blank separators carry no text
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };

        let data = data.trim_start();
        if data == DONE_MARKER {
            self.done = true;
            return;
        }
        payloads.push(data.to_string());
    }
}
