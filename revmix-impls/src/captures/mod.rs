mod pcm_stream_capture;

pub use pcm_stream_capture::*;
