//! Command-line interface module.

mod args;
pub mod ats;
pub mod build;
pub mod init;
pub mod render;
pub mod validate;

pub use args::{BuildArgs, Cli, Commands};
