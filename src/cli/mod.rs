//
//  gocd-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod config;
mod environment;
mod pipeline;
mod version;

pub use config::ConfigCommand;
pub use environment::EnvironmentCommand;
pub use pipeline::PipelineCommand;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::GoCdClient;
use crate::config::{Config, Overrides};
use crate::output::OutputFormat;

/// GoCD CLI - Administer a GoCD server from the command line
#[derive(Parser, Debug)]
#[command(
    name = "gocd",
    version,
    about = "Administer a GoCD server from the command line",
    long_about = "gocd talks to the GoCD REST API.\n\n\
                  It reads pipeline runs, pauses and schedules pipelines, \
                  and edits pipeline configurations and environments.",
    propagate_version = true,
    after_help = "Use 'gocd <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// GoCD server URL, e.g. https://ci.example.com
    #[arg(long, short = 's', global = true, env = "GOCD_SERVER")]
    pub server: Option<String>,

    /// Username for basic authentication
    #[arg(long, short = 'u', global = true, env = "GOCD_USERNAME")]
    pub username: Option<String>,

    /// Password or access token for basic authentication
    #[arg(long, global = true, env = "GOCD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the GoCD server version
    Version,

    /// Inspect and control pipelines, and manage their configuration
    #[command(visible_alias = "p")]
    Pipeline(PipelineCommand),

    /// Manage environments
    #[command(visible_alias = "environment")]
    Env(EnvironmentCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Runs the selected command.
    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Version => version::run(&self.global).await,
            Commands::Pipeline(cmd) => cmd.run(&self.global).await,
            Commands::Env(cmd) => cmd.run(&self.global).await,
            Commands::Config(cmd) => cmd.run(&self.global).await,
        }
    }
}

impl GlobalOptions {
    /// Output format selected by `--json`.
    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_flag(self.json)
    }

    /// Settings from flags and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Builds a client from flags, environment and the config file.
    pub fn client(&self) -> Result<GoCdClient> {
        let config = Config::load()?;
        let connection = config.resolve(&self.overrides())?;
        debug!(server = %connection.server, "Using GoCD server");
        connection.client()
    }
}

/// Reads a request body from `path`, or from stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(buffer);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads and parses a JSON document from `path` (or stdin for `-`).
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_input(path)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a valid document", path.display()))
}
