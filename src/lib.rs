pub mod api;
pub mod assertions;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod scenario;

pub use error::{AssertionFailure, HarnessError};
