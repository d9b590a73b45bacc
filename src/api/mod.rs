//
//  gocd-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Typed access to the GoCD administrative REST API.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with authentication, header and status handling
//! - [`operation`]: The fixed endpoint table (method, media type, guards, success status)
//! - [`common`]: Error type and shared value types
//! - [`version`], [`pipelines`], [`pipeline_config`], [`environments`]:
//!   wire types plus the client methods for each endpoint family
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gocd_cli::api::GoCdClient;
//!
//! # async fn example() -> gocd_cli::api::Result<()> {
//! let mut client = GoCdClient::new("https://ci.example.com", "admin", "secret")?;
//!
//! // Read, modify, write back with the captured ETag
//! let mut env = client.environment("prod").await?;
//! env.add_pipeline("build");
//! client.replace_environment(&env).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]:
//!
//! - `Transport`: the request never got a response
//! - `Status`: the server answered with an unexpected status; carries the body
//! - `Decode`: the body was not the expected JSON

/// Core HTTP client wrapper for GoCD.
pub mod client;

/// Error type and shared value types.
pub mod common;

/// Environment admin endpoints.
pub mod environments;

/// Fixed per-endpoint request configuration.
pub mod operation;

/// Pipeline configuration admin endpoints.
pub mod pipeline_config;

/// Pipeline run history and execution control.
pub mod pipelines;

/// Server version endpoint.
pub mod version;

pub use client::GoCdClient;
pub use common::{ApiError, EnvironmentVariable, Link, Links, Result};
pub use environments::{
    AgentUuid, EmbeddedEnvironments, Environment, EnvironmentAgent, EnvironmentPipeline,
    EnvironmentRequest, Environments, PipelineName,
};
pub use operation::{MediaType, Operation};
pub use pipeline_config::{
    Approval, Authorization, CreatePipelineRequest, JobConfig, Material, Parameter,
    PipelineConfig, StageConfig, Task, Timer,
};
pub use pipelines::{
    BuildCause, JobInstance, MaterialRevision, Modification, Pagination, PipelineInstance,
    PipelineInstances, StageInstance, PAUSE_CAUSE,
};
pub use version::Version;
