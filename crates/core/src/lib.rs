pub mod config;
pub mod error;
pub mod history;
pub mod persist;
pub mod snapshot;

pub use config::TwinConfig;
pub use error::{Result, TwinError};
pub use history::*;
pub use snapshot::*;
