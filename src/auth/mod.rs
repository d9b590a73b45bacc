//
//  gocd-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! GoCD's API accepts HTTP Basic authentication on every endpoint. This
//! module holds the username/password pair and turns it into the
//! `Authorization` header attached to each request.
//!
//! ## Example
//!
//! ```rust
//! use gocd_cli::auth::Credentials;
//!
//! let credentials = Credentials::new("admin", "secret");
//! assert_eq!(credentials.header_value(), "Basic YWRtaW46c2VjcmV0");
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

/// Username and password used for HTTP Basic authentication.
///
/// Immutable once built. The `Debug` implementation never prints the
/// password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the `Authorization` header value, `Basic base64(user:password)`.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// Applies the credentials to an HTTP request.
    ///
    /// The header is marked sensitive so it does not show up in debug output
    /// of the request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match HeaderValue::from_str(&self.header_value()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.header(AUTHORIZATION, value)
            }
            // not reachable for base64 output
            Err(_) => request.basic_auth(&self.username, Some(&self.password)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
