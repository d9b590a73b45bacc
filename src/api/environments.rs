//
//  gocd-cli
//  api/environments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Environment admin API (v1).
//!
//! An environment groups pipelines and agents and shares a set of
//! environment variables between them. Like pipeline configurations,
//! environments are replaced as a whole.
//!
//! # Wire format for writes
//!
//! The server returns pipelines and agents as full objects with their own
//! links, but create and replace only accept identifiers. Writes therefore
//! go through [`EnvironmentRequest`], which reduces each pipeline to
//! `{"name": ...}` and each agent to `{"uuid": ...}`:
//!
//! ```rust
//! use gocd_cli::api::{Environment, EnvironmentRequest};
//!
//! let env: Environment = serde_json::from_str(r#"{
//!     "name": "prod",
//!     "pipelines": [{"_links": {"self": {"href": "https://ci/go/api/admin/pipelines/up42"}}, "name": "up42"}],
//!     "agents": [{"uuid": "12345678-e2f6-4c78-123456789012"}],
//!     "environment_variables": []
//! }"#).unwrap();
//!
//! let body = serde_json::to_value(EnvironmentRequest::from(&env)).unwrap();
//! assert_eq!(body["pipelines"][0], serde_json::json!({"name": "up42"}));
//! assert_eq!(body["agents"][0], serde_json::json!({"uuid": "12345678-e2f6-4c78-123456789012"}));
//! ```

use serde::{Deserialize, Serialize};

use super::client::{encode, GoCdClient};
use super::common::{EnvironmentVariable, Links, Result};
use super::operation::Operation;

/// A named group of pipelines and agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Environment {
    /// HAL links.
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Environment name; identifies the resource in the URL.
    pub name: String,

    /// Pipelines assigned to this environment.
    #[serde(default)]
    pub pipelines: Vec<EnvironmentPipeline>,

    /// Agents assigned to this environment.
    #[serde(default)]
    pub agents: Vec<EnvironmentAgent>,

    /// Variables shared by everything in the environment.
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
}

/// A pipeline as listed inside an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvironmentPipeline {
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    pub name: String,
}

/// An agent as listed inside an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvironmentAgent {
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    pub uuid: String,
}

/// Response of the environment listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Environments {
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedEnvironments,
}

/// The `_embedded` block of [`Environments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmbeddedEnvironments {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// Pipeline reference sent on create/replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineName<'a> {
    pub name: &'a str,
}

/// Agent reference sent on create/replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentUuid<'a> {
    pub uuid: &'a str,
}

/// Body of create and replace requests.
///
/// Only identifying fields of members are carried; links and any other
/// server-side detail are dropped by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentRequest<'a> {
    pub name: &'a str,
    pub pipelines: Vec<PipelineName<'a>>,
    pub agents: Vec<AgentUuid<'a>>,
    pub environment_variables: &'a [EnvironmentVariable],
}

impl<'a> From<&'a Environment> for EnvironmentRequest<'a> {
    fn from(env: &'a Environment) -> Self {
        Self {
            name: &env.name,
            pipelines: env
                .pipelines
                .iter()
                .map(|p| PipelineName { name: &p.name })
                .collect(),
            agents: env
                .agents
                .iter()
                .map(|a| AgentUuid { uuid: &a.uuid })
                .collect(),
            environment_variables: &env.environment_variables,
        }
    }
}

impl Environment {
    /// Creates an empty environment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether `pipeline` is a member.
    pub fn has_pipeline(&self, pipeline: &str) -> bool {
        self.pipelines.iter().any(|p| p.name == pipeline)
    }

    /// Removes `pipeline` from the member list. Returns whether it was there.
    pub fn remove_pipeline(&mut self, pipeline: &str) -> bool {
        let before = self.pipelines.len();
        self.pipelines.retain(|p| p.name != pipeline);
        self.pipelines.len() != before
    }

    /// Adds `pipeline` unless it is already a member.
    pub fn add_pipeline(&mut self, pipeline: impl Into<String>) {
        let name = pipeline.into();
        if !self.has_pipeline(&name) {
            self.pipelines.push(EnvironmentPipeline {
                links: Links::new(),
                name,
            });
        }
    }

    /// Adds the agent `uuid` unless it is already a member.
    pub fn add_agent(&mut self, uuid: impl Into<String>) {
        let uuid = uuid.into();
        if !self.agents.iter().any(|a| a.uuid == uuid) {
            self.agents.push(EnvironmentAgent {
                links: Links::new(),
                uuid,
            });
        }
    }
}

impl Environments {
    /// The listed environments.
    pub fn as_slice(&self) -> &[Environment] {
        &self.embedded.environments
    }

    /// Consumes the listing and returns the environments.
    pub fn into_vec(self) -> Vec<Environment> {
        self.embedded.environments
    }

    /// The first environment that has `pipeline` as a member.
    pub fn find_by_pipeline(&self, pipeline: &str) -> Option<&Environment> {
        self.as_slice().iter().find(|env| env.has_pipeline(pipeline))
    }
}

impl GoCdClient {
    /// Lists all environments and stores the ETag if the server sent one.
    ///
    /// `GET /go/api/admin/environments`
    pub async fn environments(&mut self) -> Result<Environments> {
        self.call(
            Operation::ListEnvironments,
            &["go", "api", "admin", "environments"],
            None,
        )
        .await
    }

    /// Fetches one environment and stores its ETag.
    ///
    /// `GET /go/api/admin/environments/{name}`
    pub async fn environment(&mut self, name: &str) -> Result<Environment> {
        self.call(
            Operation::GetEnvironment,
            &["go", "api", "admin", "environments", name],
            None,
        )
        .await
    }

    /// Creates an environment.
    ///
    /// `POST /go/api/admin/environments`
    pub async fn create_environment(&mut self, env: &Environment) -> Result<()> {
        let body = encode(&EnvironmentRequest::from(env))?;
        self.call_empty(
            Operation::CreateEnvironment,
            &["go", "api", "admin", "environments"],
            Some(body),
        )
        .await
    }

    /// Replaces the environment `env.name` using the stored ETag.
    ///
    /// `PUT /go/api/admin/environments/{name}`
    pub async fn replace_environment(&mut self, env: &Environment) -> Result<()> {
        let body = encode(&EnvironmentRequest::from(env))?;
        self.call_empty(
            Operation::ReplaceEnvironment,
            &["go", "api", "admin", "environments", &env.name],
            Some(body),
        )
        .await
    }

    /// Deletes the environment `name` using the stored ETag.
    ///
    /// `DELETE /go/api/admin/environments/{name}`
    pub async fn delete_environment(&mut self, name: &str) -> Result<()> {
        self.call_empty(
            Operation::DeleteEnvironment,
            &["go", "api", "admin", "environments", name],
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const ENV_JSON: &str = r#"{
        "_links": {
            "self": {"href": "https://ci.example.com/go/api/admin/environments/prod"}
        },
        "name": "prod",
        "pipelines": [
            {"_links": {"self": {"href": "https://ci.example.com/go/api/admin/pipelines/build"}}, "name": "build"},
            {"_links": {"self": {"href": "https://ci.example.com/go/api/admin/pipelines/deploy"}}, "name": "deploy"}
        ],
        "agents": [
            {"_links": {"self": {"href": "https://ci.example.com/go/api/agents/a1"}}, "uuid": "a1"}
        ],
        "environment_variables": [
            {"secure": false, "name": "REGION", "value": "eu-west-1"},
            {"secure": true, "name": "TOKEN", "encrypted_value": "aSdiFgRRZ6A="}
        ]
    }"#;

    fn client(url: &str) -> GoCdClient {
        GoCdClient::new(url, "admin", "secret").unwrap()
    }

    fn prod() -> Environment {
        serde_json::from_str(ENV_JSON).unwrap()
    }

    #[test]
    fn test_environment_round_trip() {
        let back = serde_json::to_value(prod()).unwrap();
        let original: serde_json::Value = serde_json::from_str(ENV_JSON).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_request_reduces_members_to_identifiers() {
        let env = prod();
        let body = serde_json::to_value(EnvironmentRequest::from(&env)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "prod",
                "pipelines": [{"name": "build"}, {"name": "deploy"}],
                "agents": [{"uuid": "a1"}],
                "environment_variables": [
                    {"secure": false, "name": "REGION", "value": "eu-west-1"},
                    {"secure": true, "name": "TOKEN", "encrypted_value": "aSdiFgRRZ6A="}
                ]
            })
        );
    }

    #[test]
    fn test_empty_members_serialize_as_arrays() {
        let env = Environment::new("empty");
        let body = serde_json::to_value(EnvironmentRequest::from(&env)).unwrap();
        assert_eq!(body["pipelines"], json!([]));
        assert_eq!(body["agents"], json!([]));
    }

    #[test]
    fn test_remove_pipeline() {
        let mut env = prod();
        assert!(env.remove_pipeline("build"));
        assert!(!env.remove_pipeline("build"));
        assert_eq!(env.pipelines.len(), 1);
        assert_eq!(env.pipelines[0].name, "deploy");
    }

    #[test]
    fn test_add_members_is_idempotent() {
        let mut env = Environment::new("qa");
        env.add_pipeline("build");
        env.add_pipeline("build");
        env.add_agent("a1");
        env.add_agent("a1");
        assert_eq!(env.pipelines.len(), 1);
        assert_eq!(env.agents.len(), 1);
    }

    #[test]
    fn test_find_by_pipeline_returns_first_match() {
        let listing: Environments = serde_json::from_value(json!({
            "_embedded": {
                "environments": [
                    {"name": "dev", "pipelines": [{"name": "lint"}]},
                    {"name": "prod", "pipelines": [{"name": "build"}]},
                    {"name": "dr", "pipelines": [{"name": "build"}]}
                ]
            }
        }))
        .unwrap();
        assert_eq!(listing.find_by_pipeline("build").unwrap().name, "prod");
        assert!(listing.find_by_pipeline("missing").is_none());
        assert_eq!(listing.into_vec().len(), 3);
    }

    #[tokio::test]
    async fn test_get_environment_captures_etag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/go/api/admin/environments/prod")
            .match_header("accept", "application/vnd.go.cd.v1+json")
            .with_status(200)
            .with_header("ETag", "\"env-1\"")
            .with_body(ENV_JSON)
            .create_async()
            .await;

        let mut client = client(&server.url());
        let env = client.environment("prod").await.unwrap();

        assert_eq!(env.agents[0].uuid, "a1");
        assert_eq!(client.etag(), "\"env-1\"");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_environment_sends_identifiers_only() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/go/api/admin/environments")
            .match_header("accept", "application/vnd.go.cd.v1+json")
            .match_header("if-match", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({
                "name": "prod",
                "pipelines": [{"name": "build"}, {"name": "deploy"}],
                "agents": [{"uuid": "a1"}]
            })))
            .with_status(200)
            .with_body(ENV_JSON)
            .create_async()
            .await;

        client(&server.url()).create_environment(&prod()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_environment_uses_etag() {
        let mut server = Server::new_async().await;
        let mut env = prod();
        env.remove_pipeline("deploy");
        let mock = server
            .mock("PUT", "/go/api/admin/environments/prod")
            .match_header("if-match", "\"env-1\"")
            .match_body(Matcher::PartialJson(json!({
                "pipelines": [{"name": "build"}]
            })))
            .with_status(200)
            .with_body(ENV_JSON)
            .create_async()
            .await;

        let mut client = client(&server.url());
        client.set_etag("\"env-1\"");
        client.replace_environment(&env).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_environment_uses_etag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/go/api/admin/environments/prod")
            .match_header("if-match", "\"env-1\"")
            .match_header("accept", "application/vnd.go.cd.v1+json")
            .with_status(200)
            .with_body(r#"{"message":"Environment 'prod' was deleted successfully."}"#)
            .create_async()
            .await;

        let mut client = client(&server.url());
        client.set_etag("\"env-1\"");
        client.delete_environment("prod").await.unwrap();
        mock.assert_async().await;
    }
}
