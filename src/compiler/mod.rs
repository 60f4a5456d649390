pub mod command;
pub mod config;
pub mod locator;

pub use command::*;
pub use config::*;
pub use locator::*;
