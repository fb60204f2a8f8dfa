//! Merges per-chunk recognition results into one diarized transcript.
//!
//! Chunk-local timestamps are rebased onto a global timeline, then all words
//! are rendered as speaker-labelled turns. Speaker tags are chunk-local; a
//! tag change across a chunk boundary always starts a new turn even when the
//! same person kept talking (diarization renumbers per invocation, and no
//! cross-chunk identity reconciliation is attempted).

use crate::error::{Result, ScribaError};
use crate::transcribe::types::{ChunkResult, WordSpan};

/// The final artifact of a transcription run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptResult {
    /// Speaker-labelled transcript text.
    pub text: String,
    /// Spoken duration in whole seconds (truncated).
    pub duration_seconds: u64,
    /// Highest per-chunk speaker count observed.
    pub total_speaker_count: u32,
}

impl TranscriptResult {
    /// Result for a recording that produced no words.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            duration_seconds: 0,
            total_speaker_count: 0,
        }
    }
}

/// Stitches ordered chunk results into a [`TranscriptResult`].
#[derive(Debug, Default)]
pub struct TranscriptAssembler;

impl TranscriptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Merge chunk results into one transcript.
    ///
    /// `results` must be sorted by chunk index and the indices must form a
    /// contiguous sequence from zero; anything else is a contract violation
    /// upstream and fails with [`ScribaError::Assembly`].
    ///
    /// The timeline offset advances to the latest word end of each chunk.
    /// Chunks with no words leave the offset where it was, so a silent chunk
    /// never inflates downstream timestamps.
    pub fn merge(&self, results: &[ChunkResult]) -> Result<TranscriptResult> {
        let mut timeline_offset = 0.0f64;
        let mut all_words: Vec<WordSpan> = Vec::new();
        let mut total_speaker_count = 0u32;

        for (position, result) in results.iter().enumerate() {
            if result.chunk_index != position as u64 {
                return Err(ScribaError::Assembly {
                    message: format!(
                        "chunk results not contiguous: expected index {position}, got {}",
                        result.chunk_index
                    ),
                });
            }

            let mut chunk_end = timeline_offset;
            for word in &result.words {
                let shifted = WordSpan {
                    text: word.text.clone(),
                    start_offset: word.start_offset + timeline_offset,
                    end_offset: word.end_offset + timeline_offset,
                    speaker_tag: word.speaker_tag,
                };
                if shifted.end_offset > chunk_end {
                    chunk_end = shifted.end_offset;
                }
                all_words.push(shifted);
            }
            if !result.words.is_empty() {
                timeline_offset = chunk_end;
            }

            total_speaker_count = total_speaker_count.max(result.local_speaker_count);
        }

        // Stable, so words sharing a start keep chunk/word order
        all_words.sort_by(|a, b| a.start_offset.total_cmp(&b.start_offset));

        Ok(TranscriptResult {
            text: render_speaker_turns(&all_words),
            duration_seconds: timeline_offset as u64,
            total_speaker_count,
        })
    }
}

/// Render rebased words as newline-separated speaker turns.
///
/// A `Speaker N: ` label opens each turn; words within a turn are joined
/// with single spaces.
fn render_speaker_turns(words: &[WordSpan]) -> String {
    let mut text = String::new();
    let mut current_speaker: Option<u32> = None;

    for word in words {
        if current_speaker == Some(word.speaker_tag) {
            text.push(' ');
        } else {
            if current_speaker.is_some() {
                text.push('\n');
            }
            text.push_str(&format!("Speaker {}: ", word.speaker_tag));
            current_speaker = Some(word.speaker_tag);
        }
        text.push_str(&word.text);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: u64, words: Vec<WordSpan>, local_speaker_count: u32) -> ChunkResult {
        ChunkResult {
            chunk_index: index,
            words,
            local_speaker_count,
        }
    }

    #[test]
    fn test_single_chunk_single_speaker() {
        let results = [chunk(
            0,
            vec![
                WordSpan::new("buongiorno", 0.0, 0.8, 1),
                WordSpan::new("a", 0.9, 1.0, 1),
                WordSpan::new("tutti", 1.1, 1.6, 1),
            ],
            1,
        )];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.text, "Speaker 1: buongiorno a tutti");
        assert_eq!(merged.duration_seconds, 1);
        assert_eq!(merged.total_speaker_count, 1);
    }

    #[test]
    fn test_same_speaker_across_boundary_stays_one_turn() {
        // Chunk 0 holds one second of speaker 1, chunk 1 another two seconds
        // of speaker 1; the merged transcript is a single turn of 3 seconds.
        let results = [
            chunk(0, vec![WordSpan::new("hello", 0.0, 1.0, 1)], 1),
            chunk(
                1,
                vec![
                    WordSpan::new("again", 0.0, 1.0, 1),
                    WordSpan::new("everyone", 1.0, 2.0, 1),
                ],
                1,
            ),
        ];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.text, "Speaker 1: hello again everyone");
        assert_eq!(merged.duration_seconds, 3);
        assert_eq!(merged.total_speaker_count, 1);
    }

    #[test]
    fn test_rebasing_orders_later_chunk_after_earlier() {
        // Chunk 1's words start at local 0.0, before chunk 0's word at 0.5.
        // Rebasing must place them after chunk 0 on the global timeline.
        let results = [
            chunk(0, vec![WordSpan::new("first", 0.5, 1.0, 1)], 1),
            chunk(1, vec![WordSpan::new("second", 0.0, 0.5, 1)], 1),
        ];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.text, "Speaker 1: first second");
    }

    #[test]
    fn test_tag_change_at_boundary_starts_new_turn() {
        // Chunk 0 ends with local speaker 2, chunk 1 opens with local
        // speaker 1. Tags are not comparable across chunks, so a new label
        // is emitted even though the person may be the same.
        let results = [
            chunk(
                0,
                vec![
                    WordSpan::new("we", 0.0, 0.4, 1),
                    WordSpan::new("agree", 0.5, 1.0, 2),
                ],
                2,
            ),
            chunk(1, vec![WordSpan::new("continuing", 0.0, 0.7, 1)], 1),
        ];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(
            merged.text,
            "Speaker 1: we\nSpeaker 2: agree\nSpeaker 1: continuing"
        );
    }

    #[test]
    fn test_speaker_count_is_max_of_locals() {
        let results = [
            chunk(0, vec![WordSpan::new("a", 0.0, 0.5, 2)], 2),
            chunk(1, vec![WordSpan::new("b", 0.0, 0.5, 5)], 5),
            chunk(2, vec![WordSpan::new("c", 0.0, 0.5, 3)], 3),
        ];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.total_speaker_count, 5);
    }

    #[test]
    fn test_no_chunks_is_empty_result() {
        let merged = TranscriptAssembler::new().merge(&[]).unwrap();
        assert_eq!(merged, TranscriptResult::empty());
    }

    #[test]
    fn test_all_empty_chunks_is_empty_result() {
        let results = [chunk(0, vec![], 0), chunk(1, vec![], 0)];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.text, "");
        assert_eq!(merged.duration_seconds, 0);
        assert_eq!(merged.total_speaker_count, 0);
    }

    #[test]
    fn test_empty_chunk_does_not_advance_timeline() {
        let results = [
            chunk(0, vec![WordSpan::new("one", 0.0, 1.0, 1)], 1),
            chunk(1, vec![], 0),
            chunk(2, vec![WordSpan::new("two", 0.0, 2.0, 1)], 1),
        ];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        // Chunk 2 rebases onto the 1.0s mark left by chunk 0
        assert_eq!(merged.duration_seconds, 3);
        assert_eq!(merged.text, "Speaker 1: one two");
    }

    #[test]
    fn test_rebasing_is_consistent_with_prefix_merge() {
        let a = chunk(0, vec![WordSpan::new("alpha", 0.0, 1.5, 1)], 1);
        let b = chunk(1, vec![WordSpan::new("beta", 0.0, 2.0, 1)], 1);

        let assembler = TranscriptAssembler::new();
        let prefix = assembler.merge(std::slice::from_ref(&a)).unwrap();
        let full = assembler.merge(&[a, b]).unwrap();

        // B rebases onto exactly the timeline A ended at: 1.5 + 2.0
        assert_eq!(prefix.duration_seconds, 1);
        assert_eq!(full.duration_seconds, 3);
    }

    #[test]
    fn test_duration_truncates_fractional_seconds() {
        let results = [chunk(0, vec![WordSpan::new("word", 0.0, 2.7, 1)], 1)];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.duration_seconds, 2);
    }

    #[test]
    fn test_tie_on_start_keeps_input_order() {
        let results = [chunk(
            0,
            vec![
                WordSpan::new("first", 1.0, 1.2, 1),
                WordSpan::new("second", 1.0, 1.4, 1),
            ],
            1,
        )];

        let merged = TranscriptAssembler::new().merge(&results).unwrap();

        assert_eq!(merged.text, "Speaker 1: first second");
    }

    #[test]
    fn test_gap_in_indices_is_assembly_error() {
        let results = [
            chunk(0, vec![WordSpan::new("a", 0.0, 0.5, 1)], 1),
            chunk(2, vec![WordSpan::new("b", 0.0, 0.5, 1)], 1),
        ];

        let error = TranscriptAssembler::new().merge(&results).unwrap_err();

        assert!(matches!(error, ScribaError::Assembly { .. }));
    }

    #[test]
    fn test_out_of_order_indices_is_assembly_error() {
        let results = [
            chunk(1, vec![WordSpan::new("b", 0.0, 0.5, 1)], 1),
            chunk(0, vec![WordSpan::new("a", 0.0, 0.5, 1)], 1),
        ];

        let error = TranscriptAssembler::new().merge(&results).unwrap_err();

        assert!(matches!(error, ScribaError::Assembly { .. }));
    }
}
