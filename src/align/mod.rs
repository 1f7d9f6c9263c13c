// Smart Alignment Engine
//
// Reconciles three independently timed tracks (video, voiceover, script)
// into one timeline with correctly timed captions. The engine module is the
// orchestrator; everything else is a pure function it calls.

pub mod audio_energy;
pub mod captions;
pub mod engine;
pub mod refine;
pub mod scene;
pub mod script;
pub mod strategy;
pub mod types;
