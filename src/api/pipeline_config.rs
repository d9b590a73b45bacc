//
//  gocd-cli
//  api/pipeline_config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline configuration admin API (v2).
//!
//! A pipeline configuration is always read and written as a whole; there is
//! no partial update. Replacing one requires the ETag of the most recent
//! read, which the client stores for you:
//!
//! ```rust,no_run
//! use gocd_cli::api::GoCdClient;
//!
//! # async fn example() -> gocd_cli::api::Result<()> {
//! let mut client = GoCdClient::new("https://ci.example.com", "admin", "secret")?;
//! let mut config = client.pipeline_config("build").await?;
//! config.label_template = Some("${COUNT}-${git[:8]}".to_string());
//! client.replace_pipeline_config(&config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Material attributes, task attributes and a few job-level blocks vary by
//! plugin and type. They are kept as raw JSON so a read-modify-write cycle
//! does not drop anything this crate does not model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::client::{encode, GoCdClient};
use super::common::{EnvironmentVariable, Links, Result};
use super::operation::Operation;

fn default_true() -> bool {
    true
}

/// The full desired-state definition of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// HAL links.
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Pipeline name; identifies the resource in the URL.
    pub name: String,

    /// Template for run labels, e.g. `${COUNT}`.
    #[serde(default)]
    pub label_template: Option<String>,

    #[serde(default)]
    pub enable_pipeline_locking: bool,

    /// Template the stages come from, if any. Mutually exclusive with `stages`.
    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub materials: Vec<Material>,

    /// `None` when the pipeline is built from a template.
    #[serde(default)]
    pub stages: Option<Vec<StageConfig>>,

    #[serde(default)]
    pub tracking_tool: Option<Value>,

    #[serde(default)]
    pub timer: Option<Timer>,
}

/// A pipeline parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A material the pipeline polls, e.g. a git repository or upstream pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// `git`, `svn`, `hg`, `p4`, `tfs`, `dependency`, `package` or `plugin`.
    #[serde(rename = "type")]
    pub material_type: String,

    /// Type-specific attributes.
    #[serde(default)]
    pub attributes: Value,
}

/// Cron-style trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub spec: String,
    #[serde(default)]
    pub only_on_changes: bool,
}

/// A stage definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub fetch_materials: bool,

    #[serde(default)]
    pub clean_working_directory: bool,

    #[serde(default)]
    pub never_cleanup_artifacts: bool,

    #[serde(default)]
    pub approval: Option<Approval>,

    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// How a stage gets approved to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// `success` (automatic) or `manual`.
    #[serde(rename = "type")]
    pub approval_type: String,

    #[serde(default)]
    pub authorization: Authorization,
}

/// Users and roles allowed to approve a manual stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Authorization {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
}

/// A job definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,

    /// A number, `"all"`, or null.
    #[serde(default)]
    pub run_instance_count: Option<Value>,

    /// Minutes as a number, `"never"`, or null for the server default.
    #[serde(default)]
    pub timeout: Option<Value>,

    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,

    /// Agent resources this job needs.
    #[serde(default)]
    pub resources: Vec<String>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub tabs: Vec<Value>,

    #[serde(default)]
    pub artifacts: Vec<Value>,

    #[serde(default)]
    pub properties: Option<Vec<Value>>,
}

/// A task inside a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// `exec`, `ant`, `nant`, `rake`, `fetch` or `pluggable_task`.
    #[serde(rename = "type")]
    pub task_type: String,

    #[serde(default)]
    pub attributes: Value,
}

/// Body of a create request: the new pipeline and the group it goes into.
#[derive(Debug, Serialize)]
pub struct CreatePipelineRequest<'a> {
    pub group: &'a str,
    pub pipeline: &'a PipelineConfig,
}

impl PipelineConfig {
    /// Stages defined directly on the pipeline; empty for templated ones.
    pub fn stages(&self) -> &[StageConfig] {
        self.stages.as_deref().unwrap_or_default()
    }
}

impl GoCdClient {
    /// Fetches the configuration of `name` and stores its ETag.
    ///
    /// `GET /go/api/admin/pipelines/{name}`
    pub async fn pipeline_config(&mut self, name: &str) -> Result<PipelineConfig> {
        self.call(
            Operation::GetPipelineConfig,
            &["go", "api", "admin", "pipelines", name],
            None,
        )
        .await
    }

    /// Creates a pipeline inside `group`.
    ///
    /// `POST /go/api/admin/pipelines` with `{"group": ..., "pipeline": ...}`.
    pub async fn create_pipeline_config(&mut self, pipeline: &PipelineConfig, group: &str) -> Result<()> {
        let body = encode(&CreatePipelineRequest { group, pipeline })?;
        self.call_empty(
            Operation::CreatePipelineConfig,
            &["go", "api", "admin", "pipelines"],
            Some(body),
        )
        .await
    }

    /// Replaces the whole configuration of `pipeline.name`.
    ///
    /// Sends the stored ETag as `If-Match`; read the pipeline first with
    /// [`pipeline_config`](Self::pipeline_config).
    ///
    /// `PUT /go/api/admin/pipelines/{name}`
    pub async fn replace_pipeline_config(&mut self, pipeline: &PipelineConfig) -> Result<()> {
        let body = encode(pipeline)?;
        self.call_empty(
            Operation::ReplacePipelineConfig,
            &["go", "api", "admin", "pipelines", &pipeline.name],
            Some(body),
        )
        .await
    }

    /// Deletes `name`, then removes it from the environment that lists it.
    ///
    /// After the delete succeeds, all environments are fetched and the first
    /// one containing `name` is rewritten without it. Returns the name of
    /// the environment that was updated, or `None` if no environment
    /// referenced the pipeline.
    ///
    /// The environment write uses whatever ETag is stored at that point:
    /// the one from listing environments if the server sent one, otherwise
    /// whatever was captured before (typically the pipeline config read).
    ///
    /// # Errors
    ///
    /// The two steps are not atomic. If the delete succeeds and the
    /// environment fetch or update fails, the error is returned but the
    /// pipeline is already gone; re-check environment membership before
    /// retrying.
    ///
    /// `DELETE /go/api/admin/pipelines/{name}`
    pub async fn delete_pipeline_config(&mut self, name: &str) -> Result<Option<String>> {
        self.call_empty(
            Operation::DeletePipelineConfig,
            &["go", "api", "admin", "pipelines", name],
            None,
        )
        .await?;
        info!(pipeline = name, "deleted pipeline config");

        let environments = self.environments().await?;
        let Some(mut environment) = environments.find_by_pipeline(name).cloned() else {
            debug!(pipeline = name, "pipeline not referenced by any environment");
            return Ok(None);
        };

        environment.remove_pipeline(name);
        self.replace_environment(&environment).await?;
        info!(
            pipeline = name,
            environment = %environment.name,
            "removed deleted pipeline from environment"
        );

        Ok(Some(environment.name))
    }
}
