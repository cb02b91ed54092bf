//! Deterministic sliding-window text splitting.
//!
//! Each flattened record line is split independently, so a fragment never
//! spans two records. Window positions are measured in characters, not
//! bytes, so multi-byte input never splits inside a code point.

/// One bounded-length piece of a larger text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The fragment text.
    pub text: String,
    /// Zero-based position of the fragment within its source text.
    pub index: usize,
}

/// Splits text into overlapping fragments of bounded size.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker with the given window size and overlap, both in
    /// characters. The overlap is clamped below the size so the window
    /// always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_overlap = chunk_overlap.min(chunk_size - 1);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Maximum fragment length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters shared between consecutive fragments.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split one text into ordered overlapping fragments.
    ///
    /// Text no longer than the window yields a single fragment; empty text
    /// yields none. Identical input always produces an identical sequence.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![Chunk {
                text: text.to_string(),
                index: 0,
            }];
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut index = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(Chunk {
                text: chars[start..end].iter().collect(),
                index,
            });
            if end == chars.len() {
                break;
            }
            start += step;
            index += 1;
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}
