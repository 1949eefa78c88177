mod audio;
mod config;
mod data;
mod room;
mod timeline;
mod util;
mod voting;

pub use audio::*;
pub use config::*;
pub use data::*;
pub use room::*;
pub use timeline::*;
pub use util::*;
pub use voting::*;
