mod composer;
mod library;
mod preview;

pub use composer::*;
pub use library::*;
pub use preview::*;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Please add audio clips to the timeline first")]
    Empty,
}
