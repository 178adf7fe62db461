pub mod config;
pub mod serve;

pub use serve::run_serve;
