// Audio Energy Analyzer
//
// Windowed RMS over decoded PCM, with silence/speech thresholds derived from
// the track's own average energy. Self-calibrating across loud and quiet
// recordings; the average is clamped away from zero so near-silent tracks
// cannot degenerate the thresholds.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::align::types::{AudioAnalysis, Peak, SilenceWindow, SpeechWindow};
use crate::media::audio;

/// Analysis window width.
pub const WINDOW_SECS: f64 = 0.1;
/// Fraction of average amplitude below which a window is silence.
pub const SILENCE_RATIO: f64 = 0.2;
/// Fraction of average amplitude above which a window is speech.
pub const SPEECH_RATIO: f64 = 0.5;
/// Fraction of average amplitude above which a window is a peak.
pub const PEAK_RATIO: f64 = 1.5;
/// Merged silence shorter than this is not reported.
pub const MIN_SILENCE_SECS: f64 = 0.1;
/// Lower bound on the track average, guarding near-silent sources.
pub const AMPLITUDE_FLOOR: f64 = 1e-4;

/// Decode an audio resource and run the windowed energy analysis.
pub async fn analyze_audio_file(input: &Path) -> Result<AudioAnalysis> {
    let (samples, sample_rate) = audio::decode_to_pcm(input).await?;
    let analysis = analyze_samples(&samples, sample_rate);
    info!(
        "[AUDIO] {:?}: {:.2}s, avg amplitude {:.4}, {} speech / {} silent windows, {} peaks",
        input,
        analysis.duration,
        analysis.average_amplitude,
        analysis.speech_parts.len(),
        analysis.silent_parts.len(),
        analysis.peaks.len(),
    );
    Ok(analysis)
}

/// Pure analysis over linear PCM samples in `[-1, 1]`.
pub fn analyze_samples(samples: &[f32], sample_rate: u32) -> AudioAnalysis {
    let duration = samples.len() as f64 / sample_rate as f64;
    let window_len = ((sample_rate as f64 * WINDOW_SECS) as usize).max(1);

    // RMS amplitude per window.
    let mut windows: Vec<(f64, f64)> = Vec::with_capacity(samples.len() / window_len + 1);
    for (i, chunk) in samples.chunks(window_len).enumerate() {
        let time = (i * window_len) as f64 / sample_rate as f64;
        let sum_squares: f64 = chunk.iter().map(|&s| (s as f64) * (s as f64)).sum();
        let rms = (sum_squares / chunk.len() as f64).sqrt();
        windows.push((time, rms));
    }

    if windows.is_empty() {
        return AudioAnalysis::empty(duration);
    }

    let average = windows.iter().map(|(_, a)| a).sum::<f64>() / windows.len() as f64;
    let average = average.max(AMPLITUDE_FLOOR);

    let silence_threshold = average * SILENCE_RATIO;
    let speech_threshold = average * SPEECH_RATIO;

    let mut silent_parts = Vec::new();
    let mut speech_parts = Vec::new();
    let mut peaks = Vec::new();

    let mut open_silence: Option<f64> = None;
    let mut open_speech: Option<f64> = None;

    let close_silence = |start: Option<f64>, end: f64, out: &mut Vec<SilenceWindow>| {
        if let Some(start) = start {
            let span = end - start;
            if span > MIN_SILENCE_SECS {
                out.push(SilenceWindow {
                    start,
                    end,
                    duration: span,
                });
            }
        }
    };

    for &(time, amplitude) in &windows {
        if amplitude > average * PEAK_RATIO {
            peaks.push(Peak { time, amplitude });
        }

        if amplitude < silence_threshold {
            if open_silence.is_none() {
                open_silence = Some(time);
            }
            if let Some(start) = open_speech.take() {
                speech_parts.push(SpeechWindow {
                    start,
                    end: time,
                    confidence: 1.0,
                });
            }
        } else if amplitude > speech_threshold {
            if open_speech.is_none() {
                open_speech = Some(time);
            }
            close_silence(open_silence.take(), time, &mut silent_parts);
        } else {
            // Unclassified band: end whichever streak is open.
            if let Some(start) = open_speech.take() {
                speech_parts.push(SpeechWindow {
                    start,
                    end: time,
                    confidence: 1.0,
                });
            }
            close_silence(open_silence.take(), time, &mut silent_parts);
        }
    }

    // Close anything still open at end-of-track.
    if let Some(start) = open_speech {
        speech_parts.push(SpeechWindow {
            start,
            end: duration,
            confidence: 1.0,
        });
    }
    close_silence(open_silence, duration, &mut silent_parts);

    AudioAnalysis {
        duration,
        silent_parts,
        speech_parts,
        average_amplitude: average,
        peaks,
    }
}
