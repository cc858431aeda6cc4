//! # Spotifire Config
//!
//! Configuration schema, defaults, validation and loading for Spotifire.
//!
//! Files are YAML or TOML, chosen by extension, and every loaded
//! configuration passes through environment overrides and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
