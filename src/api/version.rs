//
//  gocd-cli
//  api/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server version endpoint.

use serde::{Deserialize, Serialize};

use super::client::GoCdClient;
use super::common::{Links, Result};
use super::operation::Operation;

/// Version information reported by the GoCD server.
///
/// # Example
///
/// ```rust
/// use gocd_cli::api::Version;
///
/// let json = r#"{
///     "version": "16.6.0",
///     "build_number": "3348",
///     "git_sha": "a7a5717cbd60c30006314fb8dd529796c93adaf0",
///     "full_version": "16.6.0 (3348-a7a5717cbd60c30006314fb8dd529796c93adaf0)",
///     "commit_url": "https://github.com/gocd/gocd/commits/a7a5717cbd60c30006314fb8dd529796c93adaf0"
/// }"#;
/// let version: Version = serde_json::from_str(json).unwrap();
/// assert_eq!(version.build_number, "3348");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Version {
    /// HAL links.
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,

    /// Release version, e.g. `16.6.0`.
    #[serde(default)]
    pub version: String,

    /// Build number of the release.
    #[serde(default)]
    pub build_number: String,

    /// Git commit the server was built from.
    #[serde(default)]
    pub git_sha: String,

    /// Version and build combined.
    #[serde(default)]
    pub full_version: String,

    /// Link to the commit on GitHub.
    #[serde(default)]
    pub commit_url: String,
}

impl GoCdClient {
    /// Fetches the server version.
    ///
    /// `GET /go/api/version` with the v1 media type.
    pub async fn version(&mut self) -> Result<Version> {
        self.call(Operation::Version, &["go", "api", "version"], None)
            .await
    }
}
