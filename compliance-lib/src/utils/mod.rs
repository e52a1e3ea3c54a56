mod datetime;
mod filesystem;
mod string;

pub use datetime::*;
pub use filesystem::*;
pub use string::*;
