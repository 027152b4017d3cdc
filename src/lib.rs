//! framegrab: download a video from a streaming URL and capture a burst of
//! near-duplicate still frames around a chosen timestamp.
//!
//! The core (timestamp normalization, URL time extraction, burst
//! sequencing) is pure and synchronous: see [`timecode`]. Media fetching and
//! frame decoding are delegated to external `yt-dlp` and `ffmpeg` processes
//! driven by [`services`].

pub mod errors;
pub mod services;
pub mod timecode;
pub mod utils;
