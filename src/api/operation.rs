//
//  gocd-cli
//  api/operation.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Fixed per-endpoint request configuration.
//!
//! Every call the client can make is one [`Operation`]. The variant alone
//! decides the HTTP method, which versioned media type goes in `Accept`,
//! whether the stored ETag is sent as `If-Match`, whether the `Confirm`
//! guard header is required, and which status counts as success.
//!
//! | Operation | Method | Accept | If-Match | Confirm | Success |
//! |-----------|--------|--------|----------|---------|---------|
//! | `Version` | GET | v1 | | | 200 |
//! | `PipelineInstance` | GET | | | | 200 |
//! | `PipelineHistory` | GET | | | | 200 |
//! | `GetPipelineConfig` | GET | v2 | | | 200 |
//! | `CreatePipelineConfig` | POST | v2 | | | 200 |
//! | `ReplacePipelineConfig` | PUT | v2 | yes | | 200 |
//! | `DeletePipelineConfig` | DELETE | v2 | | | 200 |
//! | `ListEnvironments` | GET | v1 | | | 200 |
//! | `GetEnvironment` | GET | v1 | | | 200 |
//! | `CreateEnvironment` | POST | v1 | | | 200 |
//! | `ReplaceEnvironment` | PUT | v1 | yes | | 200 |
//! | `DeleteEnvironment` | DELETE | v1 | yes | | 200 |
//! | `PausePipeline` | POST | | | yes | 200 |
//! | `UnpausePipeline` | POST | | | yes | 200 |
//! | `SchedulePipeline` | POST | | | yes | 202 |

use std::fmt;

use reqwest::{Method, StatusCode};

/// A versioned GoCD media type for the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/vnd.go.cd.v1+json`
    V1,
    /// `application/vnd.go.cd.v2+json`
    V2,
}

impl MediaType {
    /// The header value for this media type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "application/vnd.go.cd.v1+json",
            Self::V2 => "application/vnd.go.cd.v2+json",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the fixed GoCD endpoints this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Version,
    PipelineInstance,
    PipelineHistory,
    GetPipelineConfig,
    CreatePipelineConfig,
    ReplacePipelineConfig,
    DeletePipelineConfig,
    ListEnvironments,
    GetEnvironment,
    CreateEnvironment,
    ReplaceEnvironment,
    DeleteEnvironment,
    PausePipeline,
    UnpausePipeline,
    SchedulePipeline,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Operation; 15] = [
        Self::Version,
        Self::PipelineInstance,
        Self::PipelineHistory,
        Self::GetPipelineConfig,
        Self::CreatePipelineConfig,
        Self::ReplacePipelineConfig,
        Self::DeletePipelineConfig,
        Self::ListEnvironments,
        Self::GetEnvironment,
        Self::CreateEnvironment,
        Self::ReplaceEnvironment,
        Self::DeleteEnvironment,
        Self::PausePipeline,
        Self::UnpausePipeline,
        Self::SchedulePipeline,
    ];

    /// HTTP method used by this operation.
    pub fn method(self) -> Method {
        match self {
            Self::Version
            | Self::PipelineInstance
            | Self::PipelineHistory
            | Self::GetPipelineConfig
            | Self::ListEnvironments
            | Self::GetEnvironment => Method::GET,
            Self::CreatePipelineConfig
            | Self::CreateEnvironment
            | Self::PausePipeline
            | Self::UnpausePipeline
            | Self::SchedulePipeline => Method::POST,
            Self::ReplacePipelineConfig | Self::ReplaceEnvironment => Method::PUT,
            Self::DeletePipelineConfig | Self::DeleteEnvironment => Method::DELETE,
        }
    }

    /// Versioned media type sent as `Accept`, if any.
    pub fn accept(self) -> Option<MediaType> {
        match self {
            Self::Version
            | Self::ListEnvironments
            | Self::GetEnvironment
            | Self::CreateEnvironment
            | Self::ReplaceEnvironment
            | Self::DeleteEnvironment => Some(MediaType::V1),
            Self::GetPipelineConfig
            | Self::CreatePipelineConfig
            | Self::ReplacePipelineConfig
            | Self::DeletePipelineConfig => Some(MediaType::V2),
            Self::PipelineInstance
            | Self::PipelineHistory
            | Self::PausePipeline
            | Self::UnpausePipeline
            | Self::SchedulePipeline => None,
        }
    }

    /// Whether the stored concurrency token is sent as `If-Match`.
    pub fn sends_if_match(self) -> bool {
        matches!(
            self,
            Self::ReplacePipelineConfig | Self::ReplaceEnvironment | Self::DeleteEnvironment
        )
    }

    /// Whether the server requires `Confirm: true`.
    pub fn requires_confirm(self) -> bool {
        matches!(
            self,
            Self::PausePipeline | Self::UnpausePipeline | Self::SchedulePipeline
        )
    }

    /// The only status accepted as success.
    pub fn success_status(self) -> StatusCode {
        match self {
            Self::SchedulePipeline => StatusCode::ACCEPTED,
            _ => StatusCode::OK,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Version => "version",
            Self::PipelineInstance => "get pipeline instance",
            Self::PipelineHistory => "get pipeline history",
            Self::GetPipelineConfig => "get pipeline config",
            Self::CreatePipelineConfig => "create pipeline config",
            Self::ReplacePipelineConfig => "replace pipeline config",
            Self::DeletePipelineConfig => "delete pipeline config",
            Self::ListEnvironments => "list environments",
            Self::GetEnvironment => "get environment",
            Self::CreateEnvironment => "create environment",
            Self::ReplaceEnvironment => "replace environment",
            Self::DeleteEnvironment => "delete environment",
            Self::PausePipeline => "pause pipeline",
            Self::UnpausePipeline => "unpause pipeline",
            Self::SchedulePipeline => "schedule pipeline",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_schedule_expects_accepted() {
        for op in Operation::ALL {
            let expected = if op == Operation::SchedulePipeline {
                StatusCode::ACCEPTED
            } else {
                StatusCode::OK
            };
            assert_eq!(op.success_status(), expected, "{op}");
        }
    }

    #[test]
    fn test_confirm_is_limited_to_execution_control() {
        let confirmed: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.requires_confirm())
            .collect();
        assert_eq!(
            confirmed,
            vec![
                Operation::PausePipeline,
                Operation::UnpausePipeline,
                Operation::SchedulePipeline
            ]
        );
        assert!(confirmed.iter().all(|op| op.method() == Method::POST));
        assert!(confirmed.iter().all(|op| op.accept().is_none()));
    }

    #[test]
    fn test_pipeline_config_family_uses_v2() {
        for op in [
            Operation::GetPipelineConfig,
            Operation::CreatePipelineConfig,
            Operation::ReplacePipelineConfig,
            Operation::DeletePipelineConfig,
        ] {
            assert_eq!(op.accept(), Some(MediaType::V2));
        }
        assert_eq!(Operation::Version.accept(), Some(MediaType::V1));
        assert_eq!(Operation::GetEnvironment.accept(), Some(MediaType::V1));
    }

    #[test]
    fn test_if_match_operations() {
        assert!(Operation::ReplacePipelineConfig.sends_if_match());
        assert!(Operation::ReplaceEnvironment.sends_if_match());
        assert!(Operation::DeleteEnvironment.sends_if_match());
        assert!(!Operation::DeletePipelineConfig.sends_if_match());
        assert!(!Operation::CreateEnvironment.sends_if_match());
    }

    #[test]
    fn test_media_type_strings() {
        assert_eq!(MediaType::V1.to_string(), "application/vnd.go.cd.v1+json");
        assert_eq!(MediaType::V2.as_str(), "application/vnd.go.cd.v2+json");
    }
}
