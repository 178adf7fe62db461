//! Song catalog service for songbook.
//!
//! Layers, outermost first:
//!
//! - [`http`]: the `axum` router and handlers.
//! - [`service`]: validation and the error taxonomy callers see.
//! - [`store`]: SQLite access on the blocking pool plus the lyrics lookup
//!   performed when a song is added.
//!
//! [`config`] loads the settings the binary wires these layers with.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod http;
pub mod service;
pub mod store;

pub use config::Config;
pub use service::{ServiceError, ServiceResult, SongService};
pub use store::{SongStore, StoreError};
