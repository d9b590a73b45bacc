//
//  gocd-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the GoCD API
//!
//! This module provides the core HTTP client for interacting with a GoCD
//! server. It turns one [`Operation`] into exactly one HTTP exchange.
//!
//! ## Features
//!
//! - Basic authentication header injection on every request
//! - Per-operation `Accept`, `If-Match` and `Confirm` headers
//! - `Content-Type: application/json` on every request
//! - Exact success-status checks (200, or 202 for scheduling)
//! - ETag capture for optimistic concurrency
//! - Custom User-Agent header

use std::borrow::Cow;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::common::{ApiError, Result};
use super::operation::Operation;
use crate::auth::Credentials;

/// Header GoCD requires on pipeline execution-control endpoints.
pub const CONFIRM: &str = "confirm";

/// The main HTTP client for a GoCD server.
///
/// Holds the connection identity (base address and credentials) plus one
/// piece of session state: the concurrency token (ETag) captured from the
/// most recent successful response that carried one. Replace and delete
/// operations that need `If-Match` send whatever token is stored at that
/// moment; if nothing has been read yet the token is empty and the server
/// is expected to reject the write.
///
/// # Concurrency
///
/// Every operation takes `&mut self` because it may overwrite the stored
/// token. The client is meant for one logical caller at a time. Callers that
/// want parallel requests should either serialize access to one client (for
/// example behind a `tokio::sync::Mutex`) or keep one client, or one token
/// via [`etag`](Self::etag) / [`set_etag`](Self::set_etag), per resource.
/// No locking happens inside the client and no operation issues more than
/// one request concurrently.
///
/// Timeouts, proxies and TLS are properties of the `reqwest::Client`; pass
/// a configured one through [`with_http_client`](Self::with_http_client).
///
/// # Example
///
/// ```rust,no_run
/// use gocd_cli::api::GoCdClient;
///
/// # async fn example() -> gocd_cli::api::Result<()> {
/// let mut client = GoCdClient::new("https://ci.example.com", "admin", "secret")?;
/// let version = client.version().await?;
/// println!("GoCD {}", version.full_version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GoCdClient {
    /// The underlying HTTP client
    http: Client,
    /// The server address, e.g. `https://ci.example.com`
    base_url: Url,
    /// Basic authentication credentials
    credentials: Credentials,
    /// Concurrency token from the last response that carried an ETag,
    /// kept as the raw header bytes
    etag: Vec<u8>,
}

/// A successful exchange: the fully read body and the ETag, if any.
pub(crate) struct Reply {
    body: String,
    etag: Option<Vec<u8>>,
}

impl GoCdClient {
    /// Creates a new client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// `http` or `https` URL, or [`ApiError::Transport`] if the HTTP client
    /// could not be built.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let http = http_builder().build()?;
        Self::with_http_client(base_url, Credentials::new(username, password), http)
    }

    /// Creates a client that sends requests through a caller-configured
    /// `reqwest::Client`.
    pub fn with_http_client(base_url: &str, credentials: Credentials, http: Client) -> Result<Self> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            credentials,
            etag: Vec::new(),
        })
    }

    /// Returns the server address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the credentials used for every request.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the login name.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Returns the stored concurrency token; empty if none was captured.
    ///
    /// Bytes outside UTF-8 are shown lossily. The token is always sent
    /// back exactly as received; see [`etag_bytes`](Self::etag_bytes).
    pub fn etag(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.etag)
    }

    /// Returns the stored concurrency token as raw header bytes.
    pub fn etag_bytes(&self) -> &[u8] {
        &self.etag
    }

    /// Overrides the stored concurrency token.
    pub fn set_etag(&mut self, etag: impl Into<String>) {
        self.etag = etag.into().into_bytes();
    }

    /// Forgets the stored concurrency token.
    pub fn clear_etag(&mut self) {
        self.etag.clear();
    }

    /// Builds the full URL for a fixed path, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Headers for `op`. `Content-Type` is inserted last so nothing can
    /// override it.
    pub(crate) fn headers(&self, op: Operation) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(media_type) = op.accept() {
            headers.insert(ACCEPT, HeaderValue::from_static(media_type.as_str()));
        }

        if op.sends_if_match() {
            let value = HeaderValue::from_bytes(&self.etag)
                .map_err(|_| ApiError::InvalidEtag(self.etag().into_owned()))?;
            headers.insert(IF_MATCH, value);
        }

        if op.requires_confirm() {
            headers.insert(HeaderName::from_static(CONFIRM), HeaderValue::from_static("true"));
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Performs one exchange and checks the status.
    ///
    /// The response body is read exactly once on both paths. On a status
    /// mismatch the body text becomes part of the error.
    async fn send(&self, op: Operation, segments: &[&str], body: Option<Vec<u8>>) -> Result<Reply> {
        let url = self.endpoint(segments)?;
        let headers = self.headers(op)?;

        debug!(operation = %op, method = %op.method(), url = %url, "sending request");

        let mut request = self.http.request(op.method(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        request = self.credentials.apply_to_request(request);

        let response = request.send().await?;
        let status = response.status();
        let etag = response
            .headers()
            .get(ETAG)
            .map(|value| value.as_bytes().to_vec());

        if !is_success(op, status) {
            let text = response.text().await.unwrap_or_default();
            debug!(operation = %op, %status, "unexpected status");
            return Err(ApiError::Status { status, body: text });
        }

        let text = response.text().await?;
        debug!(operation = %op, %status, bytes = text.len(), "request succeeded");

        Ok(Reply { body: text, etag })
    }

    fn remember_etag(&mut self, etag: Option<Vec<u8>>) {
        if let Some(etag) = etag {
            trace!(etag = %String::from_utf8_lossy(&etag), "captured concurrency token");
            self.etag = etag;
        }
    }

    /// Runs `op` and decodes the JSON body into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &mut self,
        op: Operation,
        segments: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        let reply = self.send(op, segments, body).await?;
        let value = match serde_json::from_str(&reply.body) {
            Ok(value) => value,
            Err(source) => {
                return Err(ApiError::Decode {
                    source,
                    body: reply.body,
                })
            }
        };
        self.remember_etag(reply.etag);
        Ok(value)
    }

    /// Runs `op` and discards the response body.
    pub(crate) async fn call_empty(
        &mut self,
        op: Operation,
        segments: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<()> {
        let reply = self.send(op, segments, body).await?;
        self.remember_etag(reply.etag);
        Ok(())
    }
}

/// A `reqwest::Client` builder carrying the client's User-Agent.
pub(crate) fn http_builder() -> reqwest::ClientBuilder {
    Client::builder().user_agent(format!("gocd/{}", crate::VERSION))
}

/// Serializes a request body.
pub(crate) fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(ApiError::Encode)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ApiError::InvalidBaseUrl(raw.to_string())),
    }
}

/// Returns true when `status` matches what `op` treats as success.
pub fn is_success(op: Operation, status: StatusCode) -> bool {
    op.success_status() == status
}
