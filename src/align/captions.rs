// Caption Synthesizer
//
// Turns retimed audio segments into short on-screen chunks. Each segment's
// text is split into bounded word groups and the segment's span is divided
// evenly across them.

use crate::align::types::{AudioSegment, Caption};

/// Chunk every segment's text into captions of at most `max_words` words.
pub fn synthesize_captions(segments: &[AudioSegment], max_words: usize) -> Vec<Caption> {
    let max_words = max_words.max(1);
    let mut captions = Vec::new();

    for segment in segments {
        let words: Vec<&str> = segment.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let chunks: Vec<String> = words
            .chunks(max_words)
            .map(|chunk| chunk.join(" "))
            .collect();

        let chunk_duration = segment.duration() / chunks.len() as f64;
        for (i, chunk) in chunks.into_iter().enumerate() {
            captions.push(Caption::new(
                segment.start + i as f64 * chunk_duration,
                segment.start + (i as f64 + 1.0) * chunk_duration,
                chunk,
            ));
        }
    }

    captions
}
