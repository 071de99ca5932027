pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod repl;
pub mod session;

pub use error::{Error, Result};
