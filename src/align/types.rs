// Smart Alignment Engine - Core Records
//
// Everything here is a plain value type handed around by the alignment call
// stack. All times are seconds from the start of the relevant track.

use serde::{Deserialize, Serialize};

/// Visual character of a detected scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    Action,
    Transition,
    Static,
    Text,
}

/// One detected video scene, produced by a full pass over sampled frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSegment {
    pub start: f64,
    pub end: f64,
    pub scene_type: SceneType,
    /// 0.0 = filler, 1.0 = key moment.
    pub importance: f64,
}

impl VideoSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Qualitative speech rate derived from words-per-second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    Normal,
    Fast,
}

/// One speakable script line with its place on the timeline.
/// Start/end are first estimated from word rate, then overwritten by
/// whichever alignment strategy runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub pace: Pace,
    pub words: usize,
}

impl AudioSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Contiguous run of speech-classified energy windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechWindow {
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

/// Contiguous run of silence-classified energy windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilenceWindow {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Single energy window exceeding the peak threshold. Not merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peak {
    pub time: f64,
    pub amplitude: f64,
}

/// Result of the windowed RMS analysis of one audio track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAnalysis {
    pub duration: f64,
    pub silent_parts: Vec<SilenceWindow>,
    pub speech_parts: Vec<SpeechWindow>,
    pub average_amplitude: f64,
    pub peaks: Vec<Peak>,
}

impl AudioAnalysis {
    /// Degraded analysis used when the track cannot be decoded. Refinement
    /// passes that depend on speech windows become no-ops against it.
    pub fn empty(duration: f64) -> Self {
        Self {
            duration,
            silent_parts: Vec::new(),
            speech_parts: Vec::new(),
            average_amplitude: 0.0,
            peaks: Vec::new(),
        }
    }
}

/// Rendering hints for a caption. Kept open-ended; the editor owns styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// The unit ultimately rendered on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CaptionStyle>,
}

impl Caption {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            style: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }
}

/// The four mutually exclusive duration-reconciliation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "stretch")]
    Stretch,
    #[serde(rename = "pace-match")]
    PaceMatch,
    #[serde(rename = "scene-sync")]
    SceneSync,
    #[serde(rename = "split-audio")]
    SplitAudio,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Stretch => "stretch",
            Strategy::PaceMatch => "pace-match",
            Strategy::SceneSync => "scene-sync",
            Strategy::SplitAudio => "split-audio",
        };
        f.write_str(name)
    }
}

/// Outcome of one alignment run. The caller folds `aligned_captions` and
/// `new_duration` back into its project state; the rest is advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub video_segments: Vec<VideoSegment>,
    pub audio_segments: Vec<AudioSegment>,
    pub aligned_captions: Vec<Caption>,
    pub strategy: Strategy,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_duration: Option<f64>,
}
