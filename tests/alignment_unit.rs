// Strategy selection and branch behavior, exercised as pure functions.

use smartalign_core::align::strategy::{
    align, choose_strategy, CONFIDENCE_PACE_MATCH, CONFIDENCE_SCENE_SYNC, CONFIDENCE_SPLIT_AUDIO,
    CONFIDENCE_STRETCH,
};
use smartalign_core::align::types::{AudioSegment, Pace, SceneType, Strategy, VideoSegment};
use smartalign_core::config::AlignmentConfig;

fn audio_track(segment_count: usize, total_duration: f64) -> Vec<AudioSegment> {
    let slot = total_duration / segment_count as f64;
    (0..segment_count)
        .map(|i| AudioSegment {
            start: i as f64 * slot,
            end: (i + 1) as f64 * slot,
            text: format!("segment {} words here", i),
            pace: Pace::Normal,
            words: 3,
        })
        .collect()
}

fn full_scene(duration: f64) -> Vec<VideoSegment> {
    vec![VideoSegment {
        start: 0.0,
        end: duration,
        scene_type: SceneType::Static,
        importance: 1.0,
    }]
}

#[test]
fn strategy_selection_is_a_pure_function_of_durations() {
    let cfg = AlignmentConfig::default();
    // 5% gap: stretch.
    assert_eq!(choose_strategy(100.0, 95.0, &cfg), Strategy::Stretch);
    // Audio far shorter: scene-sync.
    assert_eq!(choose_strategy(100.0, 70.0, &cfg), Strategy::SceneSync);
    // 1.2x factor: pace-match.
    assert_eq!(choose_strategy(100.0, 120.0, &cfg), Strategy::PaceMatch);
    // 2.0x factor exceeds the 1.3 cutoff: split-audio.
    assert_eq!(choose_strategy(100.0, 200.0, &cfg), Strategy::SplitAudio);
}

#[test]
fn stretch_scales_segments_by_duration_ratio() {
    let cfg = AlignmentConfig::default();
    let audio = vec![AudioSegment {
        start: 10.0,
        end: 20.0,
        text: "ten seconds of narration".to_string(),
        pace: Pace::Normal,
        words: 4,
    }];

    let result = align(full_scene(110.0), audio, 110.0, 100.0, &cfg);

    assert_eq!(result.strategy, Strategy::Stretch);
    assert_eq!(result.confidence, CONFIDENCE_STRETCH);
    let seg = &result.audio_segments[0];
    assert!((seg.start - 11.0).abs() < 1e-9);
    assert!((seg.end - 22.0).abs() < 1e-9);
    // Stretch is a uniform retime; pace is untouched.
    assert_eq!(seg.pace, Pace::Normal);
}

#[test]
fn scene_sync_keeps_audio_inside_the_video() {
    let cfg = AlignmentConfig::default();
    let result = align(full_scene(100.0), audio_track(5, 70.0), 100.0, 70.0, &cfg);

    assert_eq!(result.strategy, Strategy::SceneSync);
    assert_eq!(result.confidence, CONFIDENCE_SCENE_SYNC);
    assert_eq!(result.audio_segments.len(), 5);

    // Pauses distribute the leftover 30s across 4 gaps.
    let expected_pause = 30.0 / 4.0;
    for pair in result.audio_segments.windows(2) {
        let gap = pair[1].start - pair[0].end;
        assert!((gap - expected_pause).abs() < 1e-6, "gap was {gap}");
    }
    assert!(result.audio_segments.last().unwrap().end <= 100.0 + 1e-6);
}

#[test]
fn pace_match_compresses_and_reports_speedup() {
    let cfg = AlignmentConfig::default();
    let result = align(full_scene(100.0), audio_track(4, 120.0), 100.0, 120.0, &cfg);

    assert_eq!(result.strategy, Strategy::PaceMatch);
    assert_eq!(result.confidence, CONFIDENCE_PACE_MATCH);
    assert!(result.audio_segments.iter().all(|s| s.pace == Pace::Fast));
    assert!((result.audio_segments.last().unwrap().end - 100.0).abs() < 1e-6);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("sped up by 20.0%")));
}

#[test]
fn split_audio_drops_and_reports_the_dropped_count() {
    let cfg = AlignmentConfig::default();
    // 10 segments over 200s audio against 120s video: avg 20s, 6 fit.
    let result = align(full_scene(120.0), audio_track(10, 200.0), 120.0, 200.0, &cfg);

    assert_eq!(result.strategy, Strategy::SplitAudio);
    assert_eq!(result.confidence, CONFIDENCE_SPLIT_AUDIO);
    assert_eq!(result.audio_segments.len(), 6);

    // Kept segments are the leading ones, redistributed evenly.
    for (i, seg) in result.audio_segments.iter().enumerate() {
        assert!(seg.text.starts_with(&format!("segment {}", i)));
        assert!((seg.duration() - 20.0).abs() < 1e-6);
    }
    assert!((result.audio_segments.last().unwrap().end - 120.0).abs() < 1e-6);

    // The loss is surfaced, never silent.
    assert!(result.recommendations.iter().any(|r| r.contains("4 segments dropped")));
    assert!(result.recommendations.iter().any(|r| r.contains("first 6/10")));
}

#[test]
fn branch_confidences_are_fixed() {
    let cfg = AlignmentConfig::default();
    let cases = [
        (95.0, CONFIDENCE_STRETCH),
        (70.0, CONFIDENCE_SCENE_SYNC),
        (120.0, CONFIDENCE_PACE_MATCH),
        (200.0, CONFIDENCE_SPLIT_AUDIO),
    ];
    for (audio_duration, confidence) in cases {
        let result = align(
            full_scene(100.0),
            audio_track(4, audio_duration),
            100.0,
            audio_duration,
            &cfg,
        );
        assert_eq!(result.confidence, confidence);
    }
}
