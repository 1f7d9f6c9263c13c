// Alignment tuning knobs.
//
// Every hand-tuned threshold the engine depends on lives here with its
// reference value. Downstream tests and UI copy key off the strategy cutoffs
// (10% gap, 1.3x speedup), so changing those is a breaking change.

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Frame difference above which a scene change is declared.
    pub frame_diff_threshold: f64,
    /// Minimum scene length before a change can close it.
    pub min_scene_secs: f64,
    /// Upper bound on sampled frames per video.
    pub frame_sample_cap: usize,
    /// Raster size frames are decoded to before differencing.
    pub raster_width: u32,
    pub raster_height: u32,
    /// Per-seek decode budget. A timed-out seek skips that sample.
    pub seek_timeout_secs: u64,
    /// Gap (percent of video duration) under which stretch applies.
    pub minor_gap_percent: f64,
    /// Speedup factor above which pace-match gives way to split-audio.
    pub max_speedup: f64,
    /// Snap window around key scene starts during scene-sync placement.
    pub snap_window_secs: f64,
    /// Floor for inserted pauses between placed audio segments.
    pub min_pause_secs: f64,
    /// Importance at or above which a scene counts as a key moment.
    pub key_scene_importance: f64,
    /// Word bound per synthesized caption chunk.
    pub max_words_per_caption: usize,
    /// Minimum spacing enforced between consecutive captions.
    pub min_caption_gap: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            frame_diff_threshold: 0.3,
            min_scene_secs: 1.0,
            frame_sample_cap: 30,
            raster_width: 160,
            raster_height: 90,
            seek_timeout_secs: 10,
            minor_gap_percent: 10.0,
            max_speedup: 1.3,
            snap_window_secs: 0.5,
            min_pause_secs: 0.5,
            key_scene_importance: 0.6,
            max_words_per_caption: 5,
            min_caption_gap: 0.1,
        }
    }
}

impl AlignmentConfig {
    /// Load from `alignment_config.json` if present, else defaults.
    pub fn load() -> Self {
        if let Ok(content) = std::fs::read_to_string("alignment_config.json") {
            if let Ok(config) = serde_json::from_str(&content) {
                info!("[CONFIG] Loaded alignment config from alignment_config.json");
                return config;
            }
        }
        info!("[CONFIG] Using default alignment config");
        Self::default()
    }
}
