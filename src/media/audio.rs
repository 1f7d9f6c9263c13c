// Audio decode facade.
//
// ffmpeg extracts a mono 16kHz WAV intermediate; hound reads it back as
// normalized PCM. The intermediate lives in a scoped temp dir released on
// every exit path.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use tokio::process::Command;
use tracing::info;

/// Decode sample rate for analysis. Low on purpose: energy windows do not
/// need fidelity, and decoding stays fast on long tracks.
pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

/// Decode any ffmpeg-readable audio resource to `(samples, sample_rate)`,
/// samples normalized to `[-1, 1]`, downmixed to mono.
pub async fn decode_to_pcm(input: &Path) -> Result<(Vec<f32>, u32)> {
    let work_dir = tempfile::tempdir().context("Failed to create audio temp dir")?;
    let wav_path = work_dir.path().join("analysis.wav");

    extract_wav(input, &wav_path).await?;
    read_wav_samples(&wav_path)
}

/// Extract/convert the audio track to a mono 16kHz PCM WAV.
pub async fn extract_wav(input: &Path, output: &Path) -> Result<()> {
    info!("[MEDIA] Extracting audio from {:?}", input);

    let input_arg = input.to_str().context("Audio path is not valid UTF-8")?;
    let output_arg = output.to_str().context("WAV path is not valid UTF-8")?;

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-nostdin",
            "-i",
            input_arg,
            "-vn",
            "-ac",
            "1",
            "-ar",
            &ANALYSIS_SAMPLE_RATE.to_string(),
            output_arg,
        ])
        .output()
        .await
        .context("Failed to run ffmpeg for audio extraction")?;

    if !status.status.success() {
        anyhow::bail!(
            "ffmpeg audio extraction failed: {}",
            String::from_utf8_lossy(&status.stderr)
        );
    }
    Ok(())
}

/// Read a WAV file into normalized f32 samples.
pub fn read_wav_samples(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path).context("Failed to open extracted wav")?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / scale)
                .collect()
        }
    };

    Ok((samples, spec.sample_rate))
}
