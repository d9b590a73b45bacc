//
//  gocd-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the GoCD client
//!
//! This module provides the error type shared by every operation and the
//! small value types that appear in more than one resource family.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`Result`] - Result alias used across the `api` module
//! - [`Link`] / [`Links`] - HAL-style `_links` blocks returned by GoCD
//! - [`EnvironmentVariable`] - Name/value pair used by pipelines and environments
//!
//! # Example
//!
//! ```rust
//! use gocd_cli::api::common::ApiError;
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::Transport(_) => "could not reach the server",
//!         ApiError::Status { .. } => "server rejected the request",
//!         ApiError::Decode { .. } => "server sent something unexpected",
//!         _ => "client-side problem",
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for all GoCD API operations.
///
/// The three runtime failure kinds are kept apart so callers can tell a
/// network problem from a rejected request from a response that did not
/// match the expected shape.
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Transport` | Connection, DNS or TLS failure, or the body could not be read |
/// | `Status` | The server answered with anything but the expected status |
/// | `Decode` | The status was right but the JSON body did not parse |
/// | `Encode` | A request body could not be serialized |
/// | `InvalidBaseUrl` | The configured server address is not an http(s) URL |
/// | `InvalidEtag` | A caller-supplied ETag is not a legal header value |
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server returned a status other than the one the operation expects.
    ///
    /// `body` holds the raw response text, which for GoCD is usually a JSON
    /// object with a `message` field.
    #[error("Operation error: {status}{}", body_suffix(.body))]
    Status {
        /// The status line returned by the server
        status: StatusCode,
        /// The raw response body
        body: String,
    },

    /// The response status was successful but the body could not be decoded.
    #[error("Failed to decode response body: {source}")]
    Decode {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The raw response body that failed to decode
        body: String,
    },

    /// A request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The server address given to the client is not usable.
    #[error("Invalid server URL: {0}")]
    InvalidBaseUrl(String),

    /// The stored concurrency token cannot be sent as a header value.
    #[error("Invalid ETag value: {0:?}")]
    InvalidEtag(String),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", body)
    }
}

impl ApiError {
    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Check if this error is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Check if the server rejected a write because the `If-Match` token was stale.
    pub fn is_precondition_failed(&self) -> bool {
        self.status() == Some(StatusCode::PRECONDITION_FAILED)
    }
}

/// A single HAL link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    pub href: String,
}

/// The `_links` block GoCD attaches to most resources, keyed by relation.
pub type Links = BTreeMap<String, Link>;

/// An environment variable attached to a pipeline, stage, job or environment.
///
/// Plain variables carry `value`; secure ones come back from the server with
/// only `encrypted_value` set. Both are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvironmentVariable {
    /// Variable name.
    pub name: String,

    /// Plain-text value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Encrypted value for secure variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_value: Option<String>,

    /// Whether the server treats this variable as secret.
    #[serde(default)]
    pub secure: bool,
}

impl EnvironmentVariable {
    /// Creates a plain (non-secure) variable.
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            encrypted_value: None,
            secure: false,
        }
    }
}
