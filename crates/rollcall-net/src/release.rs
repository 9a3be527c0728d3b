//! Best-effort server-side camera release.

use crate::client::ApiClient;
use rollcall_core::CameraReleaseSignal;
use serde::Deserialize;

/// Endpoint that frees the server-held camera resource.
pub const RELEASE_PATH: &str = "/stop_webcam/";

#[derive(Debug, Deserialize)]
struct ReleaseAck {
    status: String,
}

/// Fires a detached release request. Failure is logged and never
/// retried; the local release path never waits on this call.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    api: ApiClient,
}

impl ReleaseClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CameraReleaseSignal for ReleaseClient {
    fn fire(&self) {
        let api = self.api.clone();
        tokio::spawn(async move {
            match api.get(RELEASE_PATH).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<ReleaseAck>().await {
                        Ok(ack) => {
                            tracing::info!(status = %ack.status, "server camera released")
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "server release ack unreadable")
                        }
                    }
                }
                Ok(response) => tracing::warn!(
                    status = response.status().as_u16(),
                    "server camera release refused"
                ),
                Err(e) => tracing::warn!(error = %e, "server camera release failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::CookieJar;
    use std::time::Duration;

    #[tokio::test]
    async fn fire_never_blocks_or_panics_on_dead_server() {
        let api = ApiClient::new(
            "http://127.0.0.1:9",
            CookieJar::default(),
            Duration::from_millis(100),
        )
        .unwrap();
        // The request fails in the background; fire() itself returns
        // immediately and must not propagate anything.
        ReleaseClient::new(api).fire();
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    #[test]
    fn ack_parses_the_documented_shape() {
        let ack: ReleaseAck = serde_json::from_str(r#"{"status": "camera released"}"#).unwrap();
        assert_eq!(ack.status, "camera released");
    }
}
