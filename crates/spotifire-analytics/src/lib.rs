//! # Spotifire Analytics
//!
//! Pure aggregations over caller-owned listening data: genre counts with
//! ranked artists, top tracks per calendar bucket, and audio-feature
//! summaries. Nothing here performs I/O or keeps state between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod features;
pub mod genre;
pub mod normalize;
pub mod temporal;
pub mod traits;

pub use features::*;
pub use genre::*;
pub use normalize::*;
pub use temporal::*;
pub use traits::*;
