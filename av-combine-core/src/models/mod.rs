pub mod artifact;
pub mod config;
pub mod error;
pub mod format;
pub mod media;
pub mod state;
pub mod stream;
