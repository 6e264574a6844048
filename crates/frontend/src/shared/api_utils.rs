//! API utilities for frontend-backend communication
//!
//! URL helpers plus thin `gloo-net` wrappers. Errors are flattened to `String`
//! messages that pages show as is.

use contracts::shared::retry::RetryPolicy;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Base URL for API requests: current host, backend port 3000.
///
/// Empty string if window is not available.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path (`/api/...`)
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Server error: {} {}", response.status(), body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

/// GET with bounded retries; the error of the last attempt is returned
pub async fn fetch_json_with_retry<T: DeserializeOwned>(
    url: &str,
    policy: RetryPolicy,
) -> Result<T, String> {
    policy
        .run(
            |attempt| {
                if attempt > 1 {
                    log::warn!("GET {}: retry {}/{}", url, attempt, policy.max_attempts);
                }
                fetch_json::<T>(url)
            },
            |delay| TimeoutFuture::new(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)),
        )
        .await
}
