//! Smoke-test driver for Model Context Protocol servers.
//!
//! Starts a server (or reaches an HTTP endpoint), performs the MCP
//! handshake, lists the advertised tools and invokes one of them,
//! reporting the outcome as a [`Report`] or a typed [`Error`].

mod client;
mod config;
mod driver;
mod error;
mod report;
#[cfg(test)]
mod tests;
mod types;

pub use client::McpClient;
pub use config::{
    Config, DEFAULT_PREVIEW_CHARS, DEFAULT_QUERY, DEFAULT_TOOL, ServerParams, Transport,
};
pub use driver::Driver;
pub use error::{Error, FailureKind, Result};
pub use report::Reporter;
pub use types::*;
