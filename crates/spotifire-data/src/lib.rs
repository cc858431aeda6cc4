//! # Spotifire Data
//!
//! Reads playlist exports and streaming history into the shared record
//! types, converts raw extended-history JSON into the flat CSV the rest of
//! the toolkit consumes, and memoizes parsed datasets in a cache keyed by
//! file fingerprint.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod fingerprint;
pub mod loader;
pub mod playlist;
pub mod streaming;

pub use cache::{CacheStats, DatasetCache};
pub use fingerprint::DatasetFingerprint;
pub use loader::DataLoader;
pub use playlist::{
    discover_playlists, load_playlist, parse_playlist, playlist_path, PlaylistOptions,
};
pub use streaming::{
    convert_exports, discover_exports, load_exports, load_streaming_history, parse_end_time,
    parse_export, parse_streaming_csv, write_streaming_csv, write_streaming_csv_to,
};
