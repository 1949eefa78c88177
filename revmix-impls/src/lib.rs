mod captures;
mod encoders;
mod uploads;

pub use captures::*;
pub use encoders::*;
pub use uploads::*;
