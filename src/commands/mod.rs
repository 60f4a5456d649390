pub mod build;

pub use build::{BuildCommand, BuildOptions};
