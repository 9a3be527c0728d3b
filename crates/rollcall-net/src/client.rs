//! Shared HTTP client for the school-management API.

use crate::cookie::CookieJar;
use reqwest::RequestBuilder;
use rollcall_core::NetError;
use std::time::Duration;

/// Header the CSRF token is forwarded under on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Base-URL-rooted client carrying the session cookies.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    cookies: CookieJar,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        cookies: CookieJar,
        timeout: Duration,
    ) -> Result<Self, NetError> {
        // Validate early so a bad base URL fails at startup, not on the
        // first capture.
        reqwest::Url::parse(base_url).map_err(|e| NetError::Malformed(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.cookies.csrf_token()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET request with the session cookies attached. No CSRF header:
    /// the server only checks it on state-changing methods.
    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .header(reqwest::header::COOKIE, self.cookies.raw().to_string())
    }

    /// POST request with the session cookies and the CSRF header.
    /// Fails if the jar has no CSRF token.
    pub(crate) fn post(&self, path: &str) -> Result<RequestBuilder, NetError> {
        let token = self.cookies.csrf_token().ok_or(NetError::MissingCsrf)?;
        Ok(self
            .http
            .post(self.url(path))
            .header(reqwest::header::COOKIE, self.cookies.raw().to_string())
            .header(CSRF_HEADER, token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(cookies: &str) -> ApiClient {
        ApiClient::new(
            "http://kiosk.school.test/",
            CookieJar::parse(cookies),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let api = client("csrftoken=tok");
        assert_eq!(api.base_url(), "http://kiosk.school.test");
        assert_eq!(
            api.url("/stop_webcam/"),
            "http://kiosk.school.test/stop_webcam/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::new(
            "not a url",
            CookieJar::default(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(NetError::Malformed(_))));
    }

    #[test]
    fn post_without_csrf_token_fails() {
        let api = client("sessionid=abc");
        assert!(matches!(
            api.post("/school/upload-temp-photo/"),
            Err(NetError::MissingCsrf)
        ));
    }

    #[test]
    fn post_with_csrf_token_builds() {
        let api = client("csrftoken=tok456");
        assert!(api.post("/school/upload-temp-photo/").is_ok());
    }
}
