pub mod chunker;
pub mod config;
pub mod error;
pub mod gate;
pub mod history;
pub mod loader;
pub mod source;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
