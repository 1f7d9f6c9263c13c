// Transcoding facades.
//
// Thin command-style wrappers around ffmpeg for the editor operations the
// engine's callers need. Codec behavior is ffmpeg's business, not ours.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

/// Result of a transcode operation.
#[derive(Debug)]
pub struct TranscodeResult {
    pub output_path: PathBuf,
    pub size_mb: f64,
}

/// Trim a clip to `[start, start + duration]` with a fast stream copy.
pub async fn trim_video(
    input: &Path,
    start: f64,
    duration: f64,
    output: &Path,
) -> Result<TranscodeResult> {
    info!(
        "[MEDIA] Trimming {:?} ({:.2}s + {:.2}s)",
        input, start, duration
    );

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-nostdin",
            "-ss",
            &start.to_string(),
            "-t",
            &duration.to_string(),
            "-i",
            path_arg(input)?,
            "-c",
            "copy",
            "-avoid_negative_ts",
            "make_zero",
            path_arg(output)?,
        ])
        .status()
        .await
        .context("Failed to run ffmpeg for trim")?;

    if !status.success() {
        anyhow::bail!("ffmpeg trim failed for {:?}", input);
    }
    finish(output)
}

/// Downscale to 480p for preview playback.
pub async fn downscale_video(input: &Path, output: &Path) -> Result<TranscodeResult> {
    info!("[MEDIA] Downscaling {:?} to 480p", input);

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-nostdin",
            "-i",
            path_arg(input)?,
            "-vf",
            "scale=-2:480",
            "-c:v",
            "libx264",
            "-crf",
            "28",
            "-preset",
            "ultrafast",
            path_arg(output)?,
        ])
        .status()
        .await
        .context("Failed to run ffmpeg for downscale")?;

    if !status.success() {
        anyhow::bail!("ffmpeg downscale failed for {:?}", input);
    }
    finish(output)
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().context("Path is not valid UTF-8")
}

fn finish(output: &Path) -> Result<TranscodeResult> {
    let metadata = std::fs::metadata(output)?;
    let size_mb = metadata.len() as f64 / 1_048_576.0;
    info!("[MEDIA] Wrote {:?} ({:.2} MB)", output, size_mb);
    Ok(TranscodeResult {
        output_path: output.to_path_buf(),
        size_mb,
    })
}
