// Frame Difference Analyzer
//
// Samples decoded frames at fixed instants and computes a normalized pixel
// difference between consecutive samples. Seeks are issued sequentially: the
// decoder is stateful, so each extraction waits for the previous one.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use image::RgbImage;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::AlignmentConfig;

/// One sampled instant and its difference against the previous sample.
/// The first decoded frame has no predecessor and produces no sample.
#[derive(Debug, Clone, Copy)]
pub struct FrameSample {
    pub time: f64,
    pub difference: f64,
}

/// Seek/decode the video at evenly spaced instants and return the difference
/// series. Extracted frames live in a scoped temp dir released on every exit
/// path. A seek that fails or exceeds the per-seek budget skips that sample.
pub async fn sample_frame_differences(
    video: &Path,
    duration: f64,
    config: &AlignmentConfig,
) -> Result<Vec<FrameSample>> {
    let sample_count = config.frame_sample_cap.min(duration.floor() as usize);
    if sample_count == 0 {
        return Ok(Vec::new());
    }
    let interval = duration / sample_count as f64;

    info!(
        "[FRAMES] Sampling {} frames from {:?} (every {:.2}s)",
        sample_count, video, interval
    );

    let frame_dir = tempfile::tempdir().context("Failed to create frame temp dir")?;
    let seek_budget = Duration::from_secs(config.seek_timeout_secs);

    let mut samples = Vec::new();
    let mut previous: Option<RgbImage> = None;

    for i in 0..sample_count {
        let time = i as f64 * interval;
        let frame_path = frame_dir.path().join(format!("frame_{i:04}.png"));

        match timeout(
            seek_budget,
            extract_frame(video, time, &frame_path, config),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("[FRAMES] Decode failed at {:.2}s: {}, skipping sample", time, e);
                continue;
            }
            Err(_) => {
                warn!("[FRAMES] Seek timed out at {:.2}s, skipping sample", time);
                continue;
            }
        }

        let frame = match image::open(&frame_path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                warn!("[FRAMES] Unreadable frame at {:.2}s: {}, skipping sample", time, e);
                continue;
            }
        };

        if let Some(prev) = &previous {
            samples.push(FrameSample {
                time,
                difference: frame_difference(prev, &frame),
            });
        }
        previous = Some(frame);
    }

    if previous.is_none() {
        anyhow::bail!("No frames could be decoded from {:?}", video);
    }

    info!("[FRAMES] Collected {} difference samples", samples.len());
    Ok(samples)
}

/// Mean per-channel absolute difference between two rasters, normalized to
/// `[0, 1]`. Mismatched dimensions count as a full change.
pub fn frame_difference(a: &RgbImage, b: &RgbImage) -> f64 {
    if a.dimensions() != b.dimensions() {
        return 1.0;
    }
    let pixels = (a.width() * a.height()) as f64;
    if pixels == 0.0 {
        return 0.0;
    }

    let total: f64 = a
        .pixels()
        .zip(b.pixels())
        .map(|(pa, pb)| {
            let dr = (pa[0] as i32 - pb[0] as i32).abs();
            let dg = (pa[1] as i32 - pb[1] as i32).abs();
            let db = (pa[2] as i32 - pb[2] as i32).abs();
            (dr + dg + db) as f64 / (255.0 * 3.0)
        })
        .sum();

    total / pixels
}

/// Decode a single frame at `time` into a small fixed raster to bound cost.
async fn extract_frame(
    video: &Path,
    time: f64,
    output: &Path,
    config: &AlignmentConfig,
) -> Result<()> {
    let scale = format!("scale={}:{}", config.raster_width, config.raster_height);
    let output_arg = output
        .to_str()
        .context("Frame output path is not valid UTF-8")?;
    let input_arg = video
        .to_str()
        .context("Video path is not valid UTF-8")?;

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-nostdin",
            "-ss",
            &time.to_string(),
            "-i",
            input_arg,
            "-frames:v",
            "1",
            "-vf",
            &scale,
            output_arg,
        ])
        .output()
        .await
        .context("Failed to run ffmpeg for frame extraction")?;

    if !status.status.success() {
        anyhow::bail!(
            "ffmpeg frame extraction failed: {}",
            String::from_utf8_lossy(&status.stderr)
        );
    }
    Ok(())
}
