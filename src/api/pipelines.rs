//
//  gocd-cli
//  api/pipelines.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline run records and execution control.
//!
//! This module covers the non-admin pipeline endpoints: reading a single
//! run or the run history of a pipeline, and pausing, unpausing or
//! scheduling it.
//!
//! # Execution control
//!
//! Pause, unpause and schedule all send `Confirm: true`; GoCD refuses these
//! calls without it. Scheduling is asynchronous on the server and answers
//! `202 Accepted`. A `200` from the schedule endpoint is treated as an
//! error.
//!
//! # Example
//!
//! ```rust,no_run
//! use gocd_cli::api::GoCdClient;
//!
//! # async fn example() -> gocd_cli::api::Result<()> {
//! let mut client = GoCdClient::new("https://ci.example.com", "admin", "secret")?;
//! let history = client.pipeline_history("build").await?;
//! for run in &history.pipelines {
//!     println!("{} #{} {}", run.name, run.counter, run.label);
//! }
//! client.pause_pipeline("build").await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use super::client::GoCdClient;
use super::common::Result;
use super::operation::Operation;

/// Form body sent with every pause request.
pub const PAUSE_CAUSE: &str = "pauseCause=take some rest";

/// A single run of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInstance {
    /// Server-side identifier of the run.
    pub id: u64,

    /// Pipeline name.
    pub name: String,

    /// Run counter, starting at 1.
    pub counter: u64,

    /// Label rendered from the pipeline's label template.
    #[serde(default)]
    pub label: String,

    /// Ordering key used by the dashboard.
    #[serde(default)]
    pub natural_order: f64,

    /// Whether the current user may trigger this pipeline.
    #[serde(default)]
    pub can_run: bool,

    /// Whether the server is still preparing the run.
    #[serde(default)]
    pub preparing_to_schedule: bool,

    /// Free-form comment attached to the run.
    #[serde(default)]
    pub comment: Option<String>,

    /// What triggered this run.
    #[serde(default)]
    pub build_cause: Option<BuildCause>,

    /// Stages of this run, in order.
    #[serde(default)]
    pub stages: Vec<StageInstance>,
}

/// Why a pipeline run was triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BuildCause {
    /// User that approved the run, empty for automatic triggers.
    #[serde(default)]
    pub approver: String,

    /// Whether the run was forced.
    #[serde(default)]
    pub trigger_forced: bool,

    /// Human-readable trigger description.
    #[serde(default)]
    pub trigger_message: String,

    /// Material revisions the run was built from.
    #[serde(default)]
    pub material_revisions: Vec<MaterialRevision>,
}

/// A material together with the revisions that went into a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRevision {
    /// Whether this material changed since the previous run.
    #[serde(default)]
    pub changed: bool,

    /// Material description; its shape depends on the material type.
    #[serde(default)]
    pub material: serde_json::Value,

    /// Modifications picked up from the material.
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

/// A single commit or upstream run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub revision: String,

    /// Epoch milliseconds.
    #[serde(default)]
    pub modified_time: Option<u64>,

    #[serde(default)]
    pub user_name: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,
}

/// A stage within a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageInstance {
    pub id: u64,

    pub name: String,

    /// Stage counter. GoCD sends it as a string in some versions and as a
    /// number in others.
    #[serde(deserialize_with = "string_or_number")]
    pub counter: String,

    /// `Passed`, `Failed`, `Cancelled` or `Unknown` while running.
    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub scheduled: bool,

    /// `success` or `manual`.
    #[serde(default)]
    pub approval_type: Option<String>,

    #[serde(default)]
    pub approved_by: Option<String>,

    #[serde(default)]
    pub can_run: bool,

    #[serde(default)]
    pub operate_permission: bool,

    #[serde(default)]
    pub rerun_of_counter: Option<u64>,

    #[serde(default)]
    pub jobs: Vec<JobInstance>,
}

/// A job within a stage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInstance {
    pub id: u64,

    pub name: String,

    /// e.g. `Scheduled`, `Building`, `Completed`.
    #[serde(default)]
    pub state: String,

    /// e.g. `Passed`, `Failed`, `Unknown`.
    #[serde(default)]
    pub result: String,

    /// Epoch milliseconds.
    #[serde(default)]
    pub scheduled_date: Option<u64>,
}

/// A page of a pipeline's run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineInstances {
    /// Runs, newest first.
    #[serde(default)]
    pub pipelines: Vec<PipelineInstance>,

    /// Position of this page in the full history.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Offset-based pagination block of the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub offset: u64,
    pub total: u64,
    pub page_size: u64,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Counter {
        Text(String),
        Number(u64),
    }

    Ok(match Counter::deserialize(deserializer)? {
        Counter::Text(text) => text,
        Counter::Number(number) => number.to_string(),
    })
}

impl GoCdClient {
    /// Fetches one run of `name` by its counter.
    ///
    /// `GET /go/api/pipelines/{name}/instance/{counter}`
    pub async fn pipeline_instance(&mut self, name: &str, counter: u64) -> Result<PipelineInstance> {
        let counter = counter.to_string();
        self.call(
            Operation::PipelineInstance,
            &["go", "api", "pipelines", name, "instance", &counter],
            None,
        )
        .await
    }

    /// Fetches the run history of `name`.
    ///
    /// `GET /go/api/pipelines/{name}/history`
    pub async fn pipeline_history(&mut self, name: &str) -> Result<PipelineInstances> {
        self.call(
            Operation::PipelineHistory,
            &["go", "api", "pipelines", name, "history"],
            None,
        )
        .await
    }

    /// Pauses `name`, sending [`PAUSE_CAUSE`] as the body.
    ///
    /// `POST /go/api/pipelines/{name}/pause`
    pub async fn pause_pipeline(&mut self, name: &str) -> Result<()> {
        self.call_empty(
            Operation::PausePipeline,
            &["go", "api", "pipelines", name, "pause"],
            Some(PAUSE_CAUSE.as_bytes().to_vec()),
        )
        .await
    }

    /// Unpauses `name` with an empty body.
    ///
    /// `POST /go/api/pipelines/{name}/unpause`
    pub async fn unpause_pipeline(&mut self, name: &str) -> Result<()> {
        self.call_empty(
            Operation::UnpausePipeline,
            &["go", "api", "pipelines", name, "unpause"],
            Some(Vec::new()),
        )
        .await
    }

    /// Schedules a run of `name`.
    ///
    /// `payload` is sent as-is; GoCD accepts material revisions and variable
    /// overrides here. Succeeds only on `202 Accepted`.
    ///
    /// `POST /go/api/pipelines/{name}/schedule`
    pub async fn schedule_pipeline(&mut self, name: &str, payload: impl Into<Vec<u8>>) -> Result<()> {
        self.call_empty(
            Operation::SchedulePipeline,
            &["go", "api", "pipelines", name, "schedule"],
            Some(payload.into()),
        )
        .await
    }
}
