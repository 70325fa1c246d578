//! Current-position feed for the tracked satellite.
//!
//! [`PositionClient`] abstracts over the source of samples so the refresh
//! loop can be driven by a stub in tests. [`HttpPositionClient`] talks to a
//! `wheretheiss.at`-style REST endpoint.

mod client;
mod error;
mod sample;

pub use client::{HttpPositionClient, PositionClient, DEFAULT_POSITION_URL};
pub use error::FetchError;
pub use sample::PositionSample;
