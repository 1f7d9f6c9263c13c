// Project session state.
//
// Explicit, passed-by-reference session object holding the current project's
// media and caption state. The alignment core itself is pure; this is the
// caller-side container its results are folded into.

use serde::{Deserialize, Serialize};

use crate::align::types::{AlignmentResult, Caption};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSession {
    pub video_url: String,
    pub video_duration: f64,
    pub audio_url: String,
    pub audio_duration: f64,
    pub script_text: String,
    pub captions: Vec<Caption>,
    /// Declared timeline length shown in the editor.
    pub duration: f64,
}

impl ProjectSession {
    pub fn set_video(&mut self, url: impl Into<String>, duration: f64) {
        self.video_url = url.into();
        self.video_duration = duration;
        if duration > self.duration {
            self.duration = duration;
        }
    }

    pub fn set_audio(&mut self, url: impl Into<String>, duration: f64) {
        self.audio_url = url.into();
        self.audio_duration = duration;
    }

    pub fn set_script(&mut self, text: impl Into<String>) {
        self.script_text = text.into();
    }

    /// Fold an alignment result into the session: captions are replaced,
    /// and the timeline is extended when the result asks for it.
    pub fn apply_alignment(&mut self, result: &AlignmentResult) {
        self.captions = result.aligned_captions.clone();
        if let Some(new_duration) = result.new_duration {
            if new_duration > self.duration {
                self.duration = new_duration;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::types::Strategy;

    #[test]
    fn apply_alignment_replaces_captions_and_extends_duration() {
        let mut session = ProjectSession::default();
        session.set_video("clip.mp4", 30.0);
        session.captions = vec![Caption::new(0.0, 1.0, "old")];

        let result = AlignmentResult {
            video_segments: Vec::new(),
            audio_segments: Vec::new(),
            aligned_captions: vec![Caption::new(0.0, 2.0, "new")],
            strategy: Strategy::Stretch,
            confidence: 0.95,
            recommendations: Vec::new(),
            new_duration: Some(42.0),
        };

        session.apply_alignment(&result);
        assert_eq!(session.captions.len(), 1);
        assert_eq!(session.captions[0].text, "new");
        assert_eq!(session.duration, 42.0);

        // A shorter new_duration never shrinks the timeline.
        let result = AlignmentResult {
            new_duration: Some(10.0),
            ..result
        };
        session.apply_alignment(&result);
        assert_eq!(session.duration, 42.0);
    }
}
