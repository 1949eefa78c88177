//! A typed client for the RevMix REST backend

mod auth;
mod challenges;
mod client;
mod effects;
mod errors;
mod performances;
mod rooms;
mod schemas;
mod serialized;
mod users;
mod votes;

pub use client::*;
pub use errors::*;
pub use schemas::*;
pub use serialized::Message;
