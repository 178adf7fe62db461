//! Core domain model for songbook.
//!
//! This crate defines the song catalog model (songs, details, filters and
//! pagination), the lyrics text formatter, and the SQLite schema with its
//! filtered query builder.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;
pub mod text;

pub use error::{Error, Result};
