//! Logging facility built on tracing

pub mod init;

pub use init::{init, Profile};
