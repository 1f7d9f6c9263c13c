// Caption Refiner
//
// Three order-preserving passes over a caption list: snap to detected speech,
// collapse awkward sub-300ms gaps, then enforce minimum spacing and duration.
// Also hosts the standalone duration estimator and the validator, which
// reports problems as strings and never fails.

use tracing::info;

use crate::align::types::{AudioAnalysis, Caption, SpeechWindow};

/// Gaps under this are collapsed by extending the earlier caption.
pub const SHORT_GAP_SECS: f64 = 0.3;
/// Residual gap left behind when a short gap is collapsed.
pub const COLLAPSED_GAP_SECS: f64 = 0.05;
/// Padding applied around a matched speech window.
pub const SPEECH_PAD_SECS: f64 = 0.1;
/// Duration forced onto a caption squeezed to nothing by gap enforcement.
pub const FORCED_MIN_DURATION_SECS: f64 = 1.0;
/// Reading rate used by the optimal-duration estimator.
pub const READING_WPS: f64 = 3.5;

#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Collapse pauses under 0.3s between captions.
    pub trim_short_silence: bool,
    /// Snap caption timing onto detected speech windows.
    pub adjust_caption_timing: bool,
    /// Minimum gap between consecutive captions.
    pub min_caption_gap: f64,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            trim_short_silence: true,
            adjust_caption_timing: true,
            min_caption_gap: 0.1,
        }
    }
}

/// Outcome of a refinement run.
#[derive(Debug, Clone)]
pub struct RefineReport {
    pub aligned_captions: Vec<Caption>,
    pub trimmed_silence: bool,
    pub original_duration: f64,
    pub new_duration: f64,
    pub improvements: Vec<String>,
}

/// Validator output. Structured report, never an error.
#[derive(Debug, Clone)]
pub struct CaptionReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Run all refinement passes against the audio analysis.
pub fn refine_captions(
    captions: &[Caption],
    analysis: &AudioAnalysis,
    options: &RefineOptions,
) -> RefineReport {
    let mut improvements = Vec::new();
    let mut aligned: Vec<Caption> = captions.to_vec();

    if options.adjust_caption_timing && !analysis.speech_parts.is_empty() {
        aligned = align_to_speech(&aligned, &analysis.speech_parts, options.min_caption_gap);
        improvements.push("Synced captions to speech patterns".to_string());
    }

    if options.trim_short_silence {
        aligned = collapse_short_gaps(&aligned, SHORT_GAP_SECS);
        improvements.push("Removed awkward pauses".to_string());
    }

    aligned = enforce_minimum_gaps(&aligned, options.min_caption_gap);
    improvements.push("Optimized caption spacing".to_string());

    let original_duration = captions.last().map(|c| c.end).unwrap_or(analysis.duration);
    let new_duration = aligned.last().map(|c| c.end).unwrap_or(analysis.duration);

    info!(
        "[REFINE] {} captions, {:.2}s -> {:.2}s",
        aligned.len(),
        original_duration,
        new_duration
    );

    RefineReport {
        aligned_captions: aligned,
        trimmed_silence: options.trim_short_silence,
        original_duration,
        new_duration,
        improvements,
    }
}

/// Snap each caption onto the speech window containing its midpoint, with a
/// little padding on both sides. Captions with no matching window keep their
/// timing. Never lets a snapped start collide with the previous caption.
pub fn align_to_speech(
    captions: &[Caption],
    speech: &[SpeechWindow],
    min_gap: f64,
) -> Vec<Caption> {
    let mut aligned: Vec<Caption> = Vec::with_capacity(captions.len());

    for caption in captions {
        let midpoint = caption.midpoint();
        let matched = speech
            .iter()
            .find(|window| midpoint >= window.start && midpoint <= window.end);

        let mut adjusted = caption.clone();
        if let Some(window) = matched {
            adjusted.start = (window.start - SPEECH_PAD_SECS).max(0.0);
            adjusted.end = window.end + SPEECH_PAD_SECS;

            if let Some(previous) = aligned.last() {
                if adjusted.start < previous.end + min_gap {
                    adjusted.start = previous.end + min_gap;
                }
            }
        }
        aligned.push(adjusted);
    }

    aligned
}

/// Extend the earlier caption over any sub-`max_gap` pause, leaving a small
/// residual gap rather than a blank-screen flash.
pub fn collapse_short_gaps(captions: &[Caption], max_gap: f64) -> Vec<Caption> {
    let mut result: Vec<Caption> = Vec::with_capacity(captions.len());

    for caption in captions {
        if let Some(previous) = result.last_mut() {
            let gap = caption.start - previous.end;
            if gap > 0.0 && gap < max_gap {
                let shrunk = caption.start - COLLAPSED_GAP_SECS;
                // A sub-residual gap on a very short caption could otherwise
                // pull the end before the start.
                if shrunk > previous.start {
                    previous.end = shrunk;
                }
            }
        }
        result.push(caption.clone());
    }

    result
}

/// Push captions forward until every consecutive pair is at least `min_gap`
/// apart, forcing a minimum duration on any caption squeezed to nothing.
/// Idempotent: running it on its own output changes nothing.
pub fn enforce_minimum_gaps(captions: &[Caption], min_gap: f64) -> Vec<Caption> {
    let mut result: Vec<Caption> = Vec::with_capacity(captions.len());

    for caption in captions {
        let mut adjusted = caption.clone();

        if let Some(previous) = result.last() {
            if adjusted.start < previous.end + min_gap {
                adjusted.start = previous.end + min_gap;
            }
            if adjusted.end <= adjusted.start {
                adjusted.end = adjusted.start + FORCED_MIN_DURATION_SECS;
            }
        }

        result.push(adjusted);
    }

    result
}

/// Optimal on-screen time for a caption text: reading rate 3.5 words/s,
/// clamped to [1, 5] seconds.
pub fn optimal_caption_duration(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words / READING_WPS).clamp(1.0, 5.0)
}

/// Flag captions that are too short, too long, overlapping, or oversized.
pub fn validate_captions(captions: &[Caption]) -> CaptionReport {
    let mut errors = Vec::new();

    for (index, caption) in captions.iter().enumerate() {
        let number = index + 1;
        let duration = caption.duration();

        if duration < 0.5 {
            errors.push(format!("Caption {}: Too short ({:.2}s)", number, duration));
        }
        if duration > 10.0 {
            errors.push(format!("Caption {}: Too long ({:.2}s)", number, duration));
        }

        if let Some(next) = captions.get(index + 1) {
            if caption.end > next.start {
                errors.push(format!("Caption {}: Overlaps with next caption", number));
            }
        }

        if caption.text.len() > 100 {
            errors.push(format!(
                "Caption {}: Text too long ({} chars)",
                number,
                caption.text.len()
            ));
        }
    }

    CaptionReport {
        valid: errors.is_empty(),
        errors,
    }
}
