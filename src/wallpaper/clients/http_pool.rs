//! Shared HTTP clients, one per base URL.
//!
//! Every [`ImagenClient`](super::imagen::ImagenClient) pointing at the same
//! base URL reuses one `reqwest::Client`, so connections, DNS lookups and TLS
//! sessions are reused across generations:
//! - idle connections are kept for 90 seconds
//! - up to 10 idle connections per host
//! - TCP keepalive every 60 seconds
//! - a 300 second overall request timeout, the only timeout in the crate

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

lazy_static! {
    static ref HTTP_CLIENT_POOL: Mutex<HashMap<String, reqwest::Client>> =
        Mutex::new(HashMap::new());
}

/// Get or create the shared HTTP client for `base_url`.
pub fn get_http_client(base_url: &str) -> Result<reqwest::Client, reqwest::Error> {
    let mut pool = HTTP_CLIENT_POOL
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(client) = pool.get(base_url) {
        return Ok(client.clone());
    }

    let client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .timeout(Duration::from_secs(300))
        .build()?;

    pool.insert(base_url.to_string(), client.clone());
    Ok(client)
}

/// Whether a client has already been created for `base_url`.
#[cfg(test)]
fn is_pooled(base_url: &str) -> bool {
    HTTP_CLIENT_POOL
        .lock()
        .map(|pool| pool.contains_key(base_url))
        .unwrap_or(false)
}
