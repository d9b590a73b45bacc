//
//  gocd-cli
//  config/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Server Address Helpers
//!
//! GoCD servers are usually reached at a bare host name, e.g.
//! `ci.example.com`, or at a full URL with a port such as
//! `http://localhost:8153`. The helpers here turn user input into the base
//! URL the API client expects.
//!
//! ```rust
//! use gocd_cli::config::normalize_server;
//!
//! assert_eq!(normalize_server("ci.example.com/"), "https://ci.example.com");
//! assert_eq!(normalize_server("http://localhost:8153"), "http://localhost:8153");
//! ```

/// Normalizes a server address for storage and use as a base URL.
///
/// - Surrounding whitespace and trailing slashes are removed
/// - A trailing `/go` is removed, since every API path already starts with it
/// - `https://` is assumed when no scheme is given
pub fn normalize_server(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    let server = server.strip_suffix("/go").unwrap_or(server);

    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("https://{}", server)
    }
}
