#![allow(clippy::needless_return)]

pub mod model;
pub mod utils;

pub use compliance_lib::ERRORS_LOG_FILE;
