/// Append-only, ordered store of encoder output segments.
///
/// Segments keep arrival order; `concat` consumes the buffer so it can be
/// assembled exactly once. Empty segments are ignored.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Returns `false` if it was empty and dropped.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Number of stored segments.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Join all segments in arrival order.
    pub fn concat(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }
}
