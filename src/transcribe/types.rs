//! Word-level transcription results.

/// One recognized word with chunk-local timing and speaker attribution.
///
/// Offsets are seconds from the start of the chunk that produced the word,
/// not from the start of the recording. The speaker tag is a small positive
/// integer the diarization service assigns independently per chunk; tags are
/// never comparable across chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSpan {
    pub text: String,
    pub start_offset: f64,
    pub end_offset: f64,
    pub speaker_tag: u32,
}

impl WordSpan {
    pub fn new(text: &str, start_offset: f64, end_offset: f64, speaker_tag: u32) -> Self {
        Self {
            text: text.to_string(),
            start_offset,
            end_offset,
            speaker_tag,
        }
    }
}

/// Recognition output for one chunk.
///
/// `chunk_index` ties the result back to its position in the recording;
/// assembly consumes results strictly in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkResult {
    pub chunk_index: u64,
    pub words: Vec<WordSpan>,
    pub local_speaker_count: u32,
}

impl ChunkResult {
    /// A result with no recognized words (silent or empty chunk).
    pub fn empty(chunk_index: u64) -> Self {
        Self {
            chunk_index,
            words: Vec::new(),
            local_speaker_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_span_new() {
        let word = WordSpan::new("ciao", 0.5, 0.9, 1);
        assert_eq!(word.text, "ciao");
        assert_eq!(word.start_offset, 0.5);
        assert_eq!(word.end_offset, 0.9);
        assert_eq!(word.speaker_tag, 1);
    }

    #[test]
    fn test_empty_result() {
        let result = ChunkResult::empty(3);
        assert_eq!(result.chunk_index, 3);
        assert!(result.words.is_empty());
        assert_eq!(result.local_speaker_count, 0);
    }
}
