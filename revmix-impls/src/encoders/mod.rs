mod wave_encoder;

pub use wave_encoder::*;
