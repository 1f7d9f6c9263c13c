// Alignment orchestrator.
//
// One invocation runs the full pipeline to completion: frame sampling ->
// scene segmentation, audio energy analysis, script segmentation, strategy
// selection, caption synthesis, caption refinement. Analyzer failures degrade
// to fallbacks; only a complete inability to align surfaces as an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::align::types::{AlignmentResult, AudioAnalysis, Caption};
use crate::align::{audio_energy, captions, refine, scene, script, strategy};
use crate::config::AlignmentConfig;
use crate::media::{frames, probe};

/// Caller-facing progress hook: `(message, percent)`. Advisory only.
pub type ProgressFn = Box<dyn Fn(&str, u8) + Send>;

/// Inputs for one alignment run.
#[derive(Debug, Clone)]
pub struct AlignmentRequest {
    pub video: PathBuf,
    /// Declared video duration in seconds; probed when non-positive.
    pub video_duration: f64,
    pub audio: PathBuf,
    /// Declared audio duration in seconds; probed when non-positive.
    pub audio_duration: f64,
    pub script: String,
    pub existing_captions: Vec<Caption>,
}

/// Run smart alignment end to end.
pub async fn apply_smart_alignment(
    mut request: AlignmentRequest,
    config: &AlignmentConfig,
    progress: Option<ProgressFn>,
) -> Result<AlignmentResult> {
    let report = |message: &str, percent: u8| {
        info!("[ALIGN] {}", message);
        if let Some(ref callback) = progress {
            callback(message, percent);
        }
    };

    if !request.video.exists() || !request.audio.exists() {
        anyhow::bail!("Alignment failed. Please check video and audio files.");
    }

    if request.video_duration <= 0.0 {
        request.video_duration = probe::media_duration(&request.video)
            .await
            .context("Alignment failed. Please check video and audio files.")?;
    }
    if request.audio_duration <= 0.0 {
        request.audio_duration = probe::media_duration(&request.audio)
            .await
            .context("Alignment failed. Please check video and audio files.")?;
    }
    if request.video_duration <= 0.0 || request.audio_duration <= 0.0 {
        anyhow::bail!("Alignment failed. Please check video and audio files.");
    }

    info!(
        "[ALIGN] Video: {:.2}s | Audio: {:.2}s",
        request.video_duration, request.audio_duration
    );

    // Video analysis fails soft: a decode problem degrades to evenly sized
    // fallback segments so alignment can still proceed.
    report("Analyzing video content...", 10);
    let video_segments =
        match frames::sample_frame_differences(&request.video, request.video_duration, config)
            .await
        {
            Ok(samples) => scene::segment_scenes(&samples, request.video_duration, config),
            Err(e) => {
                warn!("[ALIGN] Frame analysis failed ({}), using fallback segments", e);
                scene::fallback_segments(request.video_duration)
            }
        };

    // Audio energy fails soft too: refinement just loses speech snapping.
    report("Analyzing audio track...", 40);
    let analysis = match audio_energy::analyze_audio_file(&request.audio).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("[ALIGN] Audio analysis failed ({}), refining without speech windows", e);
            AudioAnalysis::empty(request.audio_duration)
        }
    };

    report("Segmenting script...", 55);
    let audio_segments = script::segment_script(&request.script, request.audio_duration);
    if audio_segments.is_empty() {
        warn!("[ALIGN] Script produced no segments, captions will come out empty");
    }

    report("Selecting alignment strategy...", 70);
    let mut result = strategy::align(
        video_segments,
        audio_segments,
        request.video_duration,
        request.audio_duration,
        config,
    );

    report("Generating captions...", 85);
    let mut raw_captions =
        captions::synthesize_captions(&result.audio_segments, config.max_words_per_caption);
    if raw_captions.is_empty() && !request.existing_captions.is_empty() {
        // Nothing to synthesize from the script: refine what the caller has.
        raw_captions = request.existing_captions.clone();
    }

    report("Refining caption timing...", 95);
    let options = refine::RefineOptions {
        min_caption_gap: config.min_caption_gap,
        ..Default::default()
    };
    let refined = refine::refine_captions(&raw_captions, &analysis, &options);
    result.aligned_captions = refined.aligned_captions;

    // The caller only needs a new duration when the aligned timeline runs
    // past the declared video.
    if refined.new_duration > request.video_duration {
        result.new_duration = Some(refined.new_duration);
    }

    report("Alignment complete!", 100);
    info!(
        "[ALIGN] Strategy {} (confidence {:.2}), {} captions",
        result.strategy,
        result.confidence,
        result.aligned_captions.len()
    );

    Ok(result)
}
