// smartalign-core - Smart Alignment Engine
//
// Library surface: the alignment pipeline under `align`, media facades under
// `media`, tuning knobs in `config`, and the caller-side session container.

pub mod align;
pub mod config;
pub mod media;
pub mod session;
