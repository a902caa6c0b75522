pub mod annotate;
pub mod build;
pub mod catalog;
pub mod clean;
pub mod cli;
pub mod config;
pub mod constants;
pub mod describe;
pub mod docker;
pub mod executor;
pub mod extract;
pub mod pinpull;

pub use anyhow::Result;
