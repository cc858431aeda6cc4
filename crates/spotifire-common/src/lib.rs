//! # Spotifire Common
//!
//! Shared domain records, the error taxonomy, logging bootstrap and
//! formatting helpers used by every crate in the Spotifire workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, SpotifireError};
pub use logging::*;
pub use types::*;
pub use utils::*;
