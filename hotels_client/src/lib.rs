//! Client for the hotels.com search API on RapidAPI.
//!
//! Covers the three endpoints the bot needs: region search by name,
//! property list search and per-property detail.

mod client;
mod error;
mod models;

pub use client::HotelsClient;
pub use error::{Error, Result};
pub use models::*;
