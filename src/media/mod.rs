// Media decoding and transcoding facades (ffmpeg/ffprobe subprocesses).

pub mod audio;
pub mod frames;
pub mod probe;
pub mod thumbs;
pub mod transcode;
