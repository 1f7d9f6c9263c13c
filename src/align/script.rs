// Script Segmenter
//
// Splits a voiceover script into speakable lines and lays them on an
// estimated timeline from the global word rate. Pace is a property of the
// whole read (total words over total audio), applied per line.

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::align::types::{AudioSegment, Pace};

/// Above this global rate the read is labeled fast.
pub const FAST_WPS: f64 = 3.5;
/// Below this global rate the read is labeled slow.
pub const SLOW_WPS: f64 = 2.5;

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Bracketed/parenthesized annotations like "[00:12]" or "(pause)".
    PATTERN.get_or_init(|| Regex::new(r"[\[(].*?[\])]").expect("valid markup regex"))
}

/// Split script text into ordered segments with estimated start/end times.
/// Returns an empty list when there is nothing to time (no words, or a
/// non-positive audio duration).
pub fn segment_script(text: &str, audio_duration: f64) -> Vec<AudioSegment> {
    let lines: Vec<String> = text
        .lines()
        .map(|line| markup_pattern().replace_all(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let total_words: usize = lines.iter().map(|l| word_count(l)).sum();
    if total_words == 0 || audio_duration <= 0.0 {
        return Vec::new();
    }

    let words_per_second = total_words as f64 / audio_duration;
    let pace = if words_per_second > FAST_WPS {
        Pace::Fast
    } else if words_per_second < SLOW_WPS {
        Pace::Slow
    } else {
        Pace::Normal
    };

    let mut segments = Vec::with_capacity(lines.len());
    let mut current_time = 0.0;

    for line in lines {
        let words = word_count(&line);
        let estimated = words as f64 / words_per_second;
        segments.push(AudioSegment {
            start: current_time,
            end: current_time + estimated,
            text: line,
            pace,
            words,
        });
        current_time += estimated;
    }

    info!(
        "[SCRIPT] {} lines, {} words, {:.2} words/s ({:?} pace)",
        segments.len(),
        total_words,
        words_per_second,
        pace
    );
    segments
}

fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}
