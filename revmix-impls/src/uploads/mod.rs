mod audio_file;

pub use audio_file::*;
