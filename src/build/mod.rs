pub mod config;
pub mod document;
pub mod driver;
pub mod pattern;

pub use config::*;
pub use document::DocumentNode;
pub use driver::*;
