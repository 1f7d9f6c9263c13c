// Alignment Strategist
//
// Given the two declared durations and the segment lists, pick one of four
// mutually exclusive strategies and retime the audio segments. Confidences
// are fixed per strategy, not computed from data; downstream UI keys off the
// exact strategy names and the 10% / 1.3x cutoffs.

use tracing::info;

use crate::align::types::{AlignmentResult, AudioSegment, Pace, Strategy, VideoSegment};
use crate::config::AlignmentConfig;

pub const CONFIDENCE_STRETCH: f64 = 0.95;
pub const CONFIDENCE_SCENE_SYNC: f64 = 0.85;
pub const CONFIDENCE_PACE_MATCH: f64 = 0.75;
pub const CONFIDENCE_SPLIT_AUDIO: f64 = 0.60;

/// Strategy selection is a pure function of the two declared durations.
pub fn choose_strategy(
    video_duration: f64,
    audio_duration: f64,
    config: &AlignmentConfig,
) -> Strategy {
    let gap_percent = (video_duration - audio_duration).abs() / video_duration * 100.0;
    if gap_percent < config.minor_gap_percent {
        Strategy::Stretch
    } else if audio_duration < video_duration {
        Strategy::SceneSync
    } else if audio_duration / video_duration < config.max_speedup {
        Strategy::PaceMatch
    } else {
        Strategy::SplitAudio
    }
}

/// Run the selected strategy and produce the retimed segment list plus
/// confidence and recommendations. Captions are synthesized by the caller
/// afterwards. Ordering by `start` holds on every returned segment list.
pub fn align(
    video_segments: Vec<VideoSegment>,
    audio_segments: Vec<AudioSegment>,
    video_duration: f64,
    audio_duration: f64,
    config: &AlignmentConfig,
) -> AlignmentResult {
    let strategy = choose_strategy(video_duration, audio_duration, config);
    let gap = (video_duration - audio_duration).abs();
    info!(
        "[ALIGN] Video {:.2}s | Audio {:.2}s | gap {:.2}s -> {}",
        video_duration, audio_duration, gap, strategy
    );

    match strategy {
        Strategy::Stretch => minor_adjustment(video_segments, audio_segments, video_duration, audio_duration),
        Strategy::SceneSync => audio_placement(video_segments, audio_segments, video_duration, config),
        Strategy::PaceMatch => pace_match(video_segments, audio_segments, video_duration, audio_duration),
        Strategy::SplitAudio => split_audio(video_segments, audio_segments, video_duration, audio_duration),
    }
}

/// Gap under 10%: uniform linear retime of every segment. Scene importance
/// is deliberately not consulted here.
fn minor_adjustment(
    video_segments: Vec<VideoSegment>,
    audio_segments: Vec<AudioSegment>,
    video_duration: f64,
    audio_duration: f64,
) -> AlignmentResult {
    let stretch_factor = if audio_duration > 0.0 {
        video_duration / audio_duration
    } else {
        1.0
    };

    let adjusted: Vec<AudioSegment> = audio_segments
        .into_iter()
        .map(|seg| AudioSegment {
            start: seg.start * stretch_factor,
            end: seg.end * stretch_factor,
            ..seg
        })
        .collect();

    let direction = if stretch_factor > 1.0 {
        "slightly slowed"
    } else {
        "slightly sped up"
    };

    AlignmentResult {
        video_segments,
        audio_segments: adjusted,
        aligned_captions: Vec::new(),
        strategy: Strategy::Stretch,
        confidence: CONFIDENCE_STRETCH,
        recommendations: vec![
            format!(
                "Audio will be {} by {:.1}%",
                direction,
                ((1.0 - stretch_factor).abs() * 100.0)
            ),
            "This change is barely noticeable and maintains natural flow".to_string(),
            "All content preserved with minimal quality impact".to_string(),
        ],
        new_duration: None,
    }
}

/// Audio shorter than video: walk segments in order, pull placement onto key
/// scene starts, and spread the leftover time as pauses between segments.
fn audio_placement(
    video_segments: Vec<VideoSegment>,
    audio_segments: Vec<AudioSegment>,
    video_duration: f64,
    config: &AlignmentConfig,
) -> AlignmentResult {
    let total_audio: f64 = audio_segments.iter().map(|s| s.duration()).sum();
    let pause = if audio_segments.len() > 1 {
        (video_duration - total_audio) / (audio_segments.len() - 1) as f64
    } else {
        0.0
    };
    let pause = pause.max(config.min_pause_secs);

    // Key scene starts, most important first.
    let mut key_scenes: Vec<&VideoSegment> = video_segments
        .iter()
        .filter(|s| s.importance >= config.key_scene_importance)
        .collect();
    key_scenes.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let segment_count = audio_segments.len();
    let mut placed = Vec::with_capacity(segment_count);
    let mut current_time = 0.0_f64;

    for (i, seg) in audio_segments.into_iter().enumerate() {
        // Snap forward onto a key scene start when one is just ahead.
        if let Some(scene_start) = key_scenes
            .iter()
            .map(|s| s.start)
            .find(|&start| start > current_time && start - current_time <= config.snap_window_secs)
        {
            current_time = scene_start;
        }

        let duration = seg.duration();
        placed.push(AudioSegment {
            start: current_time,
            end: current_time + duration,
            ..seg
        });
        current_time += duration;

        if i + 1 < segment_count {
            current_time += pause;
        }
    }

    AlignmentResult {
        video_segments,
        audio_segments: placed,
        aligned_captions: Vec::new(),
        strategy: Strategy::SceneSync,
        confidence: CONFIDENCE_SCENE_SYNC,
        recommendations: vec![
            format!("Audio placed at {} key moments in the video", segment_count),
            format!(
                "Added {:.1}s pauses between segments for natural pacing",
                pause
            ),
            "Consider: extend script to fill gaps, or trim video to match audio length".to_string(),
            "Tip: use B-roll footage during pauses for a professional look".to_string(),
        ],
        new_duration: None,
    }
}

/// Audio moderately longer than video: uniform compression, everything
/// marked fast.
fn pace_match(
    video_segments: Vec<VideoSegment>,
    audio_segments: Vec<AudioSegment>,
    video_duration: f64,
    audio_duration: f64,
) -> AlignmentResult {
    let speedup = audio_duration / video_duration;
    let excess_percent = (audio_duration - video_duration) / video_duration * 100.0;

    let adjusted: Vec<AudioSegment> = audio_segments
        .into_iter()
        .map(|seg| AudioSegment {
            start: seg.start / speedup,
            end: seg.end / speedup,
            pace: Pace::Fast,
            ..seg
        })
        .collect();

    AlignmentResult {
        video_segments,
        audio_segments: adjusted,
        aligned_captions: Vec::new(),
        strategy: Strategy::PaceMatch,
        confidence: CONFIDENCE_PACE_MATCH,
        recommendations: vec![
            format!("Audio is {:.1}% longer than video", excess_percent),
            format!("Voiceover sped up by {:.1}% to fit", (speedup - 1.0) * 100.0),
            "RECOMMENDED: trim script or extend video for better quality".to_string(),
            "Fast pacing may feel rushed - consider regenerating with a shorter script".to_string(),
        ],
        new_duration: None,
    }
}

/// Far too much audio: keep only the leading segments that fit and spread
/// them evenly. Lossy by design; the dropped count is surfaced in the
/// recommendations, never silently discarded.
fn split_audio(
    video_segments: Vec<VideoSegment>,
    audio_segments: Vec<AudioSegment>,
    video_duration: f64,
    audio_duration: f64,
) -> AlignmentResult {
    let total = audio_segments.len();
    let excess_percent = (audio_duration - video_duration) / video_duration * 100.0;

    let average_segment = if total > 0 {
        audio_duration / total as f64
    } else {
        0.0
    };
    let fit_count = if average_segment > 0.0 {
        ((video_duration / average_segment).floor() as usize).min(total)
    } else {
        0
    };
    let dropped = total.saturating_sub(fit_count);

    let kept: Vec<AudioSegment> = audio_segments.into_iter().take(fit_count).collect();
    let slot = if kept.is_empty() {
        0.0
    } else {
        video_duration / kept.len() as f64
    };
    let redistributed: Vec<AudioSegment> = kept
        .into_iter()
        .enumerate()
        .map(|(i, seg)| AudioSegment {
            start: i as f64 * slot,
            end: (i + 1) as f64 * slot,
            ..seg
        })
        .collect();

    AlignmentResult {
        video_segments,
        audio_segments: redistributed,
        aligned_captions: Vec::new(),
        strategy: Strategy::SplitAudio,
        confidence: CONFIDENCE_SPLIT_AUDIO,
        recommendations: vec![
            format!(
                "Audio is {:.1}% longer than video - CRITICAL MISMATCH",
                excess_percent
            ),
            format!("Using first {}/{} audio segments to fit", fit_count, total),
            format!("Remaining audio cut off ({} segments dropped)", dropped),
            "ACTION REQUIRED:".to_string(),
            "  1. TRIM SCRIPT: remove unnecessary content and regenerate voice".to_string(),
            "  2. EXTEND VIDEO: add more footage to match the full audio".to_string(),
            "  3. SPLIT PROJECT: create multiple videos for the full content".to_string(),
        ],
        new_duration: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::types::SceneType;

    fn audio_seg(start: f64, end: f64, text: &str) -> AudioSegment {
        AudioSegment {
            start,
            end,
            text: text.to_string(),
            pace: Pace::Normal,
            words: text.split_whitespace().count(),
        }
    }

    fn one_scene(duration: f64) -> Vec<VideoSegment> {
        vec![VideoSegment {
            start: 0.0,
            end: duration,
            scene_type: SceneType::Static,
            importance: 1.0,
        }]
    }

    #[test]
    fn scene_sync_inserts_pauses_with_floor() {
        let cfg = AlignmentConfig::default();
        // 100s video, two 10s segments: 80s leftover over 1 gap.
        let result = align(
            one_scene(100.0),
            vec![audio_seg(0.0, 10.0, "a"), audio_seg(10.0, 20.0, "b")],
            100.0,
            20.0,
            &cfg,
        );
        assert_eq!(result.strategy, Strategy::SceneSync);
        assert_eq!(result.confidence, CONFIDENCE_SCENE_SYNC);
        let segs = &result.audio_segments;
        // Second segment starts after first end + 80s pause.
        assert!((segs[1].start - (segs[0].end + 80.0)).abs() < 1e-9);
    }

    #[test]
    fn scene_sync_snaps_forward_to_key_scene() {
        let cfg = AlignmentConfig::default();
        let scenes = vec![
            VideoSegment {
                start: 0.0,
                end: 10.3,
                scene_type: SceneType::Static,
                importance: 0.3,
            },
            VideoSegment {
                start: 10.3,
                end: 60.0,
                scene_type: SceneType::Action,
                importance: 0.9,
            },
        ];
        // After segment a (10s duration, no pause before first), placement
        // for segment a is 0; then pause pushes b near 10.3.
        let result = align(
            scenes,
            vec![audio_seg(0.0, 5.0, "a"), audio_seg(5.0, 10.0, "b")],
            60.0,
            10.0,
            &cfg,
        );
        // Pause = (60-10)/1 = 50s, so b starts at 55 — no snap there.
        // First segment placement starts at 0; nothing within 0.5s.
        assert_eq!(result.audio_segments[0].start, 0.0);
        assert!((result.audio_segments[1].start - 55.0).abs() < 1e-9);

        // Now a layout where the running position lands just before the key
        // scene start: single 10s segment placed at 0, key scene at 0.4.
        let scenes = vec![
            VideoSegment {
                start: 0.4,
                end: 60.0,
                scene_type: SceneType::Action,
                importance: 0.9,
            },
        ];
        let result = align(scenes, vec![audio_seg(0.0, 10.0, "a")], 60.0, 10.0, &cfg);
        assert!((result.audio_segments[0].start - 0.4).abs() < 1e-9);
    }

    #[test]
    fn pace_match_marks_everything_fast() {
        let cfg = AlignmentConfig::default();
        let result = align(
            one_scene(100.0),
            vec![audio_seg(0.0, 60.0, "a"), audio_seg(60.0, 120.0, "b")],
            100.0,
            120.0,
            &cfg,
        );
        assert_eq!(result.strategy, Strategy::PaceMatch);
        assert!(result.audio_segments.iter().all(|s| s.pace == Pace::Fast));
        // Timestamps divided by 1.2.
        assert!((result.audio_segments[1].end - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ordering_by_start_holds_after_every_strategy() {
        let cfg = AlignmentConfig::default();
        let audio = vec![
            audio_seg(0.0, 20.0, "one"),
            audio_seg(20.0, 40.0, "two"),
            audio_seg(40.0, 60.0, "three"),
        ];
        for (v, a) in [(100.0, 95.0), (100.0, 60.0), (100.0, 120.0), (100.0, 200.0)] {
            let mut segs = audio.clone();
            let scale = a / 60.0;
            for s in &mut segs {
                s.start *= scale;
                s.end *= scale;
            }
            let result = align(one_scene(v), segs, v, a, &cfg);
            for pair in result.audio_segments.windows(2) {
                assert!(
                    pair[0].start <= pair[1].start,
                    "ordering violated for strategy {}",
                    result.strategy
                );
            }
        }
    }

    #[test]
    fn nan_importance_does_not_panic() {
        let cfg = AlignmentConfig::default();
        let scenes = vec![
            VideoSegment {
                start: 0.0,
                end: 30.0,
                scene_type: SceneType::Static,
                importance: f64::NAN,
            },
            VideoSegment {
                start: 30.0,
                end: 100.0,
                scene_type: SceneType::Action,
                importance: 0.9,
            },
        ];
        let result = align(
            scenes,
            vec![audio_seg(0.0, 10.0, "a"), audio_seg(10.0, 20.0, "b")],
            100.0,
            20.0,
            &cfg,
        );
        assert_eq!(result.strategy, Strategy::SceneSync);
    }

    #[test]
    fn split_audio_keeps_nothing_when_no_segment_fits() {
        let cfg = AlignmentConfig::default();
        // One 200s segment against 100s of video: nothing fits whole.
        let result = align(
            one_scene(100.0),
            vec![audio_seg(0.0, 200.0, "monologue")],
            100.0,
            200.0,
            &cfg,
        );
        assert_eq!(result.strategy, Strategy::SplitAudio);
        assert!(result.audio_segments.is_empty());
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("1 segments dropped")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("first 0/1")));
    }

    #[test]
    fn empty_audio_segments_do_not_panic() {
        let cfg = AlignmentConfig::default();
        for (v, a) in [(100.0, 95.0), (100.0, 60.0), (100.0, 120.0), (100.0, 200.0)] {
            let result = align(one_scene(v), Vec::new(), v, a, &cfg);
            assert!(result.audio_segments.is_empty());
        }
    }
}
