//
//  gocd-cli
//  tests/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cross-operation behavior of the client against a mock GoCD server:
//! ETag carry-forward between calls and environment clean-up after a
//! pipeline is deleted.

use std::sync::{Arc, Mutex};

use gocd_cli::api::{ApiError, Environment, GoCdClient, Operation, PipelineConfig};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const CONFIG_JSON: &str = r#"{
    "name": "build",
    "label_template": "${COUNT}",
    "enable_pipeline_locking": false,
    "template": null,
    "parameters": [],
    "environment_variables": [],
    "materials": [{"type": "git", "attributes": {"url": "https://github.com/gocd/gocd", "branch": "master"}}],
    "stages": [{"name": "compile", "jobs": [{"name": "make", "tasks": [{"type": "exec", "attributes": {"command": "make"}}]}]}],
    "tracking_tool": null,
    "timer": null
}"#;

fn client(server: &ServerGuard) -> GoCdClient {
    GoCdClient::new(&server.url(), "admin", "secret").unwrap()
}

fn environments_body() -> String {
    json!({
        "_links": {"self": {"href": "https://ci.example.com/go/api/admin/environments"}},
        "_embedded": {
            "environments": [
                {
                    "name": "qa",
                    "pipelines": [{"name": "lint"}],
                    "agents": [],
                    "environment_variables": []
                },
                {
                    "name": "prod",
                    "pipelines": [
                        {"_links": {"self": {"href": "https://ci.example.com/go/api/admin/pipelines/build"}}, "name": "build"},
                        {"name": "deploy"}
                    ],
                    "agents": [{"uuid": "12345678-e2f6-4c78-123456789012"}],
                    "environment_variables": [{"name": "REGION", "value": "eu", "secure": false}]
                },
                {
                    "name": "staging",
                    "pipelines": [{"name": "build"}],
                    "agents": [],
                    "environment_variables": []
                }
            ]
        }
    })
    .to_string()
}

fn prod_without_build() -> serde_json::Value {
    json!({
        "name": "prod",
        "pipelines": [{"name": "deploy"}],
        "agents": [{"uuid": "12345678-e2f6-4c78-123456789012"}],
        "environment_variables": [{"name": "REGION", "value": "eu", "secure": false}]
    })
}

#[tokio::test]
async fn test_delete_reuses_config_etag_when_listing_has_none() {
    let mut server = Server::new_async().await;
    let get_config = server
        .mock("GET", "/go/api/admin/pipelines/build")
        .with_status(200)
        .with_header("etag", "abc123")
        .with_body(CONFIG_JSON)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/go/api/admin/pipelines/build")
        .match_header("accept", "application/vnd.go.cd.v2+json")
        .with_status(200)
        .with_body(r#"{"message": "Pipeline 'build' was deleted successfully."}"#)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/go/api/admin/environments")
        .with_status(200)
        .with_body(environments_body())
        .expect(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/go/api/admin/environments/prod")
        .match_header("if-match", "abc123")
        .match_header("accept", "application/vnd.go.cd.v1+json")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(prod_without_build()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let staging = server
        .mock("PUT", "/go/api/admin/environments/staging")
        .expect(0)
        .create_async()
        .await;

    let mut client = client(&server);
    client.pipeline_config("build").await.unwrap();
    assert_eq!(client.etag(), "abc123");

    let updated = client.delete_pipeline_config("build").await.unwrap();
    assert_eq!(updated.as_deref(), Some("prod"));

    get_config.assert_async().await;
    delete.assert_async().await;
    list.assert_async().await;
    put.assert_async().await;
    staging.assert_async().await;
}

#[tokio::test]
async fn test_delete_uses_listing_etag_when_present() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/go/api/admin/pipelines/build")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/go/api/admin/environments")
        .with_status(200)
        .with_header("etag", "\"envs-7\"")
        .with_body(environments_body())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/go/api/admin/environments/prod")
        .match_header("if-match", "\"envs-7\"")
        .with_status(200)
        .create_async()
        .await;

    let mut client = client(&server);
    client.set_etag("stale");
    client.delete_pipeline_config("build").await.unwrap();

    put.assert_async().await;
}

#[tokio::test]
async fn test_delete_without_environment_reference_skips_update() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/go/api/admin/pipelines/orphan")
        .with_status(200)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/go/api/admin/environments")
        .with_status(200)
        .with_body(environments_body())
        .expect(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", Matcher::Regex(r"^/go/api/admin/environments/.*$".to_string()))
        .expect(0)
        .create_async()
        .await;

    let updated = client(&server)
        .delete_pipeline_config("orphan")
        .await
        .unwrap();
    assert_eq!(updated, None);

    list.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_environment_update_failure_is_reported_after_delete() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/go/api/admin/pipelines/build")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/go/api/admin/environments")
        .with_status(200)
        .with_body(environments_body())
        .create_async()
        .await;
    server
        .mock("PUT", "/go/api/admin/environments/prod")
        .with_status(412)
        .with_body(r#"{"message": "Someone has modified the configuration for environment 'prod'."}"#)
        .create_async()
        .await;

    let err = client(&server)
        .delete_pipeline_config("build")
        .await
        .unwrap_err();
    assert!(err.is_precondition_failed());
    delete.assert_async().await;
}

#[tokio::test]
async fn test_get_then_replace_carries_etag_verbatim() {
    let mut server = Server::new_async().await;
    let etag = "\"05548388f7ef5042cd39f7fe42e85735--gzip\"";
    server
        .mock("GET", "/go/api/admin/environments/prod")
        .with_status(200)
        .with_header("etag", etag)
        .with_body(prod_without_build().to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/go/api/admin/environments/prod")
        .match_header("if-match", etag)
        .match_body(Matcher::PartialJson(json!({"pipelines": [{"name": "deploy"}, {"name": "build"}]})))
        .with_status(200)
        .create_async()
        .await;

    let mut client = client(&server);
    let mut env = client.environment("prod").await.unwrap();
    env.add_pipeline("build");
    client.replace_environment(&env).await.unwrap();

    put.assert_async().await;
}

#[tokio::test]
async fn test_non_ascii_etag_is_sent_back_byte_for_byte() {
    let mut server = Server::new_async().await;
    let etag = "\"rév-2\"";
    server
        .mock("GET", "/go/api/admin/environments/prod")
        .with_status(200)
        .with_header("etag", etag)
        .with_body(prod_without_build().to_string())
        .create_async()
        .await;

    // mockito header matchers only see values that are valid ASCII strings
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let put = server
        .mock("PUT", "/go/api/admin/environments/prod")
        .with_status(200)
        .with_body_from_request(move |request| {
            if let Some(value) = request.header("if-match").first() {
                *recorded.lock().unwrap() = value.as_bytes().to_vec();
            }
            Vec::new()
        })
        .create_async()
        .await;

    let mut client = client(&server);
    client.set_etag("old");
    let env = client.environment("prod").await.unwrap();
    assert_eq!(client.etag(), etag);

    client.replace_environment(&env).await.unwrap();

    put.assert_async().await;
    assert_eq!(seen.lock().unwrap().as_slice(), etag.as_bytes());
}

#[tokio::test]
async fn test_failed_read_keeps_previous_etag() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/go/api/admin/pipelines/build")
        .with_status(200)
        .with_header("etag", "first")
        .with_body(CONFIG_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/go/api/admin/pipelines/missing")
        .with_status(404)
        .with_header("etag", "second")
        .with_body(r#"{"message": "Either the resource you requested was not found, or you are not authorized to perform this action."}"#)
        .create_async()
        .await;

    let mut client = client(&server);
    client.pipeline_config("build").await.unwrap();
    let err = client.pipeline_config("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(client.etag(), "first");
}

#[tokio::test]
async fn test_delete_environment_after_get() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/go/api/admin/environments/qa")
        .with_status(200)
        .with_header("etag", "qa-1")
        .with_body(r#"{"name": "qa", "pipelines": [], "agents": [], "environment_variables": []}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/go/api/admin/environments/qa")
        .match_header("if-match", "qa-1")
        .with_status(200)
        .create_async()
        .await;

    let mut client = client(&server);
    client.environment("qa").await.unwrap();
    client.delete_environment("qa").await.unwrap();

    delete.assert_async().await;
}

#[tokio::test]
async fn test_status_error_message_includes_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/go/api/admin/environments")
        .with_status(422)
        .with_body(r#"{"message": "Environment name should be unique."}"#)
        .create_async()
        .await;

    let env = Environment::new("prod");
    let err = client(&server).create_environment(&env).await.unwrap_err();
    match &err {
        ApiError::Status { status, .. } => assert_eq!(status.as_u16(), 422),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        r#"Operation error: 422 Unprocessable Entity ({"message": "Environment name should be unique."})"#
    );
}

/// Path and a decodable success body for each operation.
fn route(op: Operation) -> (&'static str, &'static str) {
    match op {
        Operation::Version => ("/go/api/version", "{}"),
        Operation::PipelineInstance => (
            "/go/api/pipelines/build/instance/1",
            r#"{"id": 1, "name": "build", "counter": 1}"#,
        ),
        Operation::PipelineHistory => ("/go/api/pipelines/build/history", "{}"),
        Operation::GetPipelineConfig => ("/go/api/admin/pipelines/build", CONFIG_JSON),
        Operation::CreatePipelineConfig => ("/go/api/admin/pipelines", ""),
        Operation::ReplacePipelineConfig => ("/go/api/admin/pipelines/build", ""),
        Operation::DeletePipelineConfig => ("/go/api/admin/pipelines/build", ""),
        Operation::ListEnvironments => ("/go/api/admin/environments", "{}"),
        Operation::GetEnvironment => ("/go/api/admin/environments/prod", r#"{"name": "prod"}"#),
        Operation::CreateEnvironment => ("/go/api/admin/environments", ""),
        Operation::ReplaceEnvironment => ("/go/api/admin/environments/prod", ""),
        Operation::DeleteEnvironment => ("/go/api/admin/environments/prod", ""),
        Operation::PausePipeline => ("/go/api/pipelines/build/pause", ""),
        Operation::UnpausePipeline => ("/go/api/pipelines/build/unpause", ""),
        Operation::SchedulePipeline => ("/go/api/pipelines/build/schedule", ""),
    }
}

async fn invoke(client: &mut GoCdClient, op: Operation) -> gocd_cli::api::Result<()> {
    let config: PipelineConfig = serde_json::from_str(CONFIG_JSON).unwrap();
    let env = Environment::new("prod");
    match op {
        Operation::Version => client.version().await.map(drop),
        Operation::PipelineInstance => client.pipeline_instance("build", 1).await.map(drop),
        Operation::PipelineHistory => client.pipeline_history("build").await.map(drop),
        Operation::GetPipelineConfig => client.pipeline_config("build").await.map(drop),
        Operation::CreatePipelineConfig => client.create_pipeline_config(&config, "first").await,
        Operation::ReplacePipelineConfig => client.replace_pipeline_config(&config).await,
        Operation::DeletePipelineConfig => client.delete_pipeline_config("build").await.map(drop),
        Operation::ListEnvironments => client.environments().await.map(drop),
        Operation::GetEnvironment => client.environment("prod").await.map(drop),
        Operation::CreateEnvironment => client.create_environment(&env).await,
        Operation::ReplaceEnvironment => client.replace_environment(&env).await,
        Operation::DeleteEnvironment => client.delete_environment("prod").await,
        Operation::PausePipeline => client.pause_pipeline("build").await,
        Operation::UnpausePipeline => client.unpause_pipeline("build").await,
        Operation::SchedulePipeline => client.schedule_pipeline("build", Vec::new()).await,
    }
}

#[tokio::test]
async fn test_every_operation_sends_auth_and_json_content_type() {
    for op in Operation::ALL {
        let mut server = Server::new_async().await;
        let mut target = None;

        // any request without the expected headers falls through to a 501
        for candidate in Operation::ALL {
            let (path, body) = route(candidate);
            let mut mock = server
                .mock(candidate.method().as_str(), path)
                .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
                .match_header("content-type", "application/json")
                .with_status(candidate.success_status().as_u16() as usize)
                .with_body(body);
            if let Some(media_type) = candidate.accept() {
                mock = mock.match_header("accept", media_type.as_str());
            }
            let mock = mock.create_async().await;
            if candidate == op {
                target = Some(mock);
            }
        }

        let mut client = client(&server);
        invoke(&mut client, op)
            .await
            .unwrap_or_else(|err| panic!("{op}: {err}"));
        target.unwrap().assert_async().await;
    }
}
