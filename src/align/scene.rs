// Scene Segmenter
//
// Consumes the frame-difference series and cuts the video into labeled,
// scored segments. Pure over its inputs; decode failures are handled upstream
// by handing this module nothing and asking for fallback segments instead.

use tracing::info;

use crate::align::types::{SceneType, VideoSegment};
use crate::config::AlignmentConfig;
use crate::media::frames::FrameSample;

/// Cut the difference series into ordered, non-overlapping segments covering
/// `[0, duration]`. A change closes the running segment only when the segment
/// is at least `min_scene_secs` long, so coverage never has holes.
pub fn segment_scenes(
    samples: &[FrameSample],
    duration: f64,
    config: &AlignmentConfig,
) -> Vec<VideoSegment> {
    let mut segments = Vec::new();
    let mut segment_start = 0.0_f64;

    for sample in samples {
        let segment_duration = sample.time - segment_start;
        if sample.difference > config.frame_diff_threshold
            && segment_duration >= config.min_scene_secs
        {
            segments.push(VideoSegment {
                start: segment_start,
                end: sample.time,
                scene_type: classify_scene(sample.difference, segment_duration),
                importance: scene_importance(sample.difference, segment_duration),
            });
            segment_start = sample.time;
        }
    }

    // Trailing segment up to the end of the video.
    if segment_start < duration {
        segments.push(VideoSegment {
            start: segment_start,
            end: duration,
            scene_type: SceneType::Static,
            importance: 0.5,
        });
    }

    // No samples or no detected changes: one segment spanning everything so
    // the strategist always has something to reason about.
    if segments.is_empty() {
        segments.push(VideoSegment {
            start: 0.0,
            end: duration,
            scene_type: SceneType::Static,
            importance: 1.0,
        });
    }

    info!("[SCENE] Segmented video into {} scenes", segments.len());
    segments
}

/// Fallback used when frame analysis itself failed (not merely found no
/// changes): evenly sized static segments at moderate importance.
pub fn fallback_segments(duration: f64) -> Vec<VideoSegment> {
    let width = (duration / 3.0).min(10.0).max(f64::EPSILON);
    let mut segments = Vec::new();
    let mut start = 0.0;

    while start < duration {
        segments.push(VideoSegment {
            start,
            end: (start + width).min(duration),
            scene_type: SceneType::Static,
            importance: 0.7,
        });
        start += width;
    }

    if segments.is_empty() {
        segments.push(VideoSegment {
            start: 0.0,
            end: duration,
            scene_type: SceneType::Static,
            importance: 0.7,
        });
    }

    info!(
        "[SCENE] Frame analysis unavailable, using {} fallback segments",
        segments.len()
    );
    segments
}

fn classify_scene(difference: f64, duration: f64) -> SceneType {
    if duration < 2.0 {
        SceneType::Transition
    } else if difference > 0.5 {
        SceneType::Action
    } else if duration > 8.0 {
        SceneType::Text
    } else {
        SceneType::Static
    }
}

/// Longer scenes with moderate motion matter most.
fn scene_importance(difference: f64, duration: f64) -> f64 {
    let duration_score = (duration / 10.0).min(1.0);
    let motion_score = difference.min(0.7);
    duration_score * 0.6 + motion_score * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, difference: f64) -> FrameSample {
        FrameSample { time, difference }
    }

    #[test]
    fn no_changes_yields_single_spanning_segment() {
        let samples = vec![sample(1.0, 0.05), sample(2.0, 0.1), sample(3.0, 0.02)];
        let segments = segment_scenes(&samples, 30.0, &AlignmentConfig::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 30.0);
    }

    #[test]
    fn empty_series_yields_single_spanning_segment() {
        let segments = segment_scenes(&[], 12.0, &AlignmentConfig::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].scene_type, SceneType::Static);
        assert_eq!(segments[0].importance, 1.0);
    }

    #[test]
    fn scene_changes_close_segments_and_cover_duration() {
        let samples = vec![
            sample(2.0, 0.05),
            sample(4.0, 0.6), // change at 4s
            sample(6.0, 0.1),
            sample(9.0, 0.45), // change at 9s
        ];
        let segments = segment_scenes(&samples, 20.0, &AlignmentConfig::default());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 4.0);
        assert_eq!(segments[1].end, 9.0);
        assert_eq!(segments[2].end, 20.0);

        // Contiguous coverage.
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn sub_second_changes_do_not_close() {
        let samples = vec![sample(0.4, 0.9), sample(5.0, 0.6)];
        let segments = segment_scenes(&samples, 10.0, &AlignmentConfig::default());
        // Only the 5s change closes a segment.
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end, 5.0);
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify_scene(0.4, 1.5), SceneType::Transition);
        assert_eq!(classify_scene(0.6, 3.0), SceneType::Action);
        assert_eq!(classify_scene(0.35, 9.0), SceneType::Text);
        assert_eq!(classify_scene(0.35, 5.0), SceneType::Static);
    }

    #[test]
    fn importance_caps_motion_contribution() {
        // Motion contribution is capped at 0.7.
        let capped = scene_importance(0.95, 10.0);
        let at_cap = scene_importance(0.7, 10.0);
        assert_eq!(capped, at_cap);
        assert!((at_cap - (0.6 + 0.4 * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn fallback_segments_cover_and_cap_width() {
        let segments = fallback_segments(45.0);
        // Width capped at 10s.
        assert!(segments.iter().all(|s| s.duration() <= 10.0 + 1e-9));
        assert_eq!(segments.first().unwrap().start, 0.0);
        assert_eq!(segments.last().unwrap().end, 45.0);
        assert!(segments.iter().all(|s| (s.importance - 0.7).abs() < 1e-9));
    }
}
