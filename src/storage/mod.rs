//! Database clients the loader writes through.

pub mod debug;
pub mod local;
pub mod sqlite;

pub use sqlite::{Client, Statement};
