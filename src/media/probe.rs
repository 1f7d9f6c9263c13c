// ffprobe metadata facade.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;

/// Total duration of any ffprobe-readable media file, in seconds.
pub async fn media_duration(path: &Path) -> Result<f64> {
    let path_arg = path.to_str().context("Media path is not valid UTF-8")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            path_arg,
        ])
        .output()
        .await
        .context("Failed to run ffprobe")?;

    if !output.status.success() {
        anyhow::bail!(
            "ffprobe failed for {:?}: {}",
            path,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let duration: f64 = String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .with_context(|| format!("Could not parse duration for {:?}", path))?;

    if duration <= 0.0 {
        anyhow::bail!("Could not determine duration of {:?}", path);
    }
    Ok(duration)
}
