//
//  gocd-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # GoCD CLI Library
//!
//! A client library and command-line interface for the administrative REST
//! API of a GoCD continuous-delivery server.
//!
//! ## Overview
//!
//! The library turns typed calls into single HTTP exchanges against a GoCD
//! server: reading the server version and pipeline runs, pausing, unpausing
//! and scheduling pipelines, and managing pipeline configurations and
//! environments with ETag-based optimistic concurrency.
//!
//! ## Module Structure
//!
//! - [`api`]: The GoCD client, the per-endpoint request table and the wire types
//! - [`auth`]: Basic authentication credentials
//! - [`config`]: Configuration file management and connection resolution
//! - [`output`]: Output formatting (Table, JSON)
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gocd_cli::api::GoCdClient;
//!
//! # async fn example() -> gocd_cli::api::Result<()> {
//! let mut client = GoCdClient::new("https://ci.example.com", "admin", "secret")?;
//!
//! // Deleting a pipeline also removes it from the environment that lists it
//! if let Some(env) = client.delete_pipeline_config("old-build").await? {
//!     println!("removed from {env}");
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Each command calls one client operation, except `update` and `delete`
/// commands that read the resource first to capture its ETag.
pub mod cli;

/// API client for the GoCD REST API.
pub mod api;

/// Basic authentication credentials.
pub mod auth;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/gocd/config.toml`
/// - macOS: `~/Library/Application Support/gocd/config.toml`
/// - Windows: `%APPDATA%\gocd\config\config.toml`
pub mod config;

/// Output formatting for table and JSON modes.
pub mod output;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use gocd_cli::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the API client.
pub use api::GoCdClient;

/// Application name, used for display purposes and configuration paths.
pub const APP_NAME: &str = "gocd";

/// Application version, taken from Cargo.toml at compile time.
///
/// Also sent as part of the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Usage errors (bad arguments) exit with 2, set by clap itself.
pub mod exit_codes {
    /// The command completed without errors.
    pub const SUCCESS: i32 = 0;

    /// Any failure: transport, unexpected status, decoding, config or I/O.
    /// Details are printed to stderr.
    pub const ERROR: i32 = 1;
}
