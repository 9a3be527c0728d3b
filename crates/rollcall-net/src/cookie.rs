//! Cookie handling for the session and CSRF credentials.

/// Name of the cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// A parsed cookie string, e.g. `"sessionid=abc; csrftoken=xyz"`.
///
/// Values are kept verbatim — the CSRF token is forwarded to the server
/// exactly as the cookie holds it.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    raw: String,
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn parse(raw: &str) -> Self {
        let cookies = raw
            .split(';')
            .filter_map(|entry| {
                let (name, value) = entry.trim().split_once('=')?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        Self {
            raw: raw.trim().to_string(),
            cookies,
        }
    }

    /// The raw cookie string, suitable for a `Cookie` request header.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Value of the cookie with exactly this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.get(CSRF_COOKIE)
    }
}
