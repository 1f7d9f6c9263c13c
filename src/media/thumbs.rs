// Timeline thumbnail strip.
//
// Fail-soft: a video that cannot be probed or decoded yields an empty list
// instead of an error, since thumbnails are cosmetic.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::process::Command;
use tracing::{info, warn};

use crate::media::probe;

/// Generate up to `count` 160x90 JPEG thumbnails at even intervals into
/// `out_dir`, returning the written paths in timeline order.
pub async fn generate_thumbnails(video: &Path, count: usize, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let duration = match probe::media_duration(video).await {
        Ok(d) => d,
        Err(e) => {
            warn!("[THUMBS] Could not probe {:?}: {}", video, e);
            return Ok(Vec::new());
        }
    };

    std::fs::create_dir_all(out_dir)?;

    let count = count.max(1);
    let interval = duration / count as f64;
    let mut thumbnails = Vec::new();

    let video_arg = match video.to_str() {
        Some(arg) => arg,
        None => {
            warn!("[THUMBS] Video path is not valid UTF-8");
            return Ok(Vec::new());
        }
    };

    for i in 0..count {
        let time = i as f64 * interval;
        let thumb_path = out_dir.join(format!("thumb_{i:04}.jpg"));
        let Some(thumb_arg) = thumb_path.to_str() else {
            continue;
        };

        let output = Command::new("ffmpeg")
            .args([
                "-y",
                "-nostdin",
                "-ss",
                &time.to_string(),
                "-i",
                video_arg,
                "-frames:v",
                "1",
                "-vf",
                "scale=160:90",
                "-q:v",
                "5",
                thumb_arg,
            ])
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => thumbnails.push(thumb_path),
            Ok(out) => warn!(
                "[THUMBS] Frame at {:.2}s failed: {}",
                time,
                String::from_utf8_lossy(&out.stderr)
            ),
            Err(e) => warn!("[THUMBS] ffmpeg did not run: {}", e),
        }
    }

    info!("[THUMBS] Generated {} thumbnails for {:?}", thumbnails.len(), video);
    Ok(thumbnails)
}
