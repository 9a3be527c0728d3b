//! One-shot startup validation.
//!
//! Every missing precondition is collected and reported in a single
//! failure before any work starts, instead of surfacing one at a time
//! as partial breakage mid-session.

use crate::config::Config;
use anyhow::bail;
use rollcall_net::CookieJar;
use std::path::Path;

/// What the requested subcommand is about to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Needs {
    /// Issues state-changing requests (requires a CSRF token).
    pub mutating: bool,
    /// Acquires the local camera device.
    pub camera: bool,
}

pub fn validate(config: &Config, needs: Needs) -> anyhow::Result<()> {
    let mut problems = Vec::new();

    if let Err(e) = reqwest::Url::parse(&config.base_url) {
        problems.push(format!("ROLLCALL_BASE_URL {:?}: {e}", config.base_url));
    }

    if needs.mutating {
        let jar = CookieJar::parse(&config.cookie);
        if jar.csrf_token().is_none() {
            problems.push(
                "ROLLCALL_COOKIE has no csrftoken cookie (required for uploads and attendance)"
                    .to_string(),
            );
        }
    }

    if needs.camera && !Path::new(&config.camera_device).exists() {
        problems.push(format!(
            "camera device {} does not exist (set ROLLCALL_CAMERA_DEVICE)",
            config.camera_device
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        bail!("startup validation failed:\n  - {}", problems.join("\n  - "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            base_url: "http://127.0.0.1:8000".into(),
            camera_device: "/dev/video99".into(),
            cookie: String::new(),
            db_path: PathBuf::from("/tmp/rollcall-test/prefs.db"),
            request_timeout_secs: 10,
        }
    }

    #[test]
    fn read_only_command_passes_without_cookie() {
        let needs = Needs {
            mutating: false,
            camera: false,
        };
        assert!(validate(&config(), needs).is_ok());
    }

    #[test]
    fn mutating_command_requires_csrf_cookie() {
        let needs = Needs {
            mutating: true,
            camera: false,
        };
        let err = validate(&config(), needs).unwrap_err();
        assert!(err.to_string().contains("csrftoken"));

        let mut ok = config();
        ok.cookie = "csrftoken=tok".into();
        assert!(validate(&ok, needs).is_ok());
    }

    #[test]
    fn all_problems_are_reported_at_once() {
        let mut broken = config();
        broken.base_url = "not a url".into();
        let needs = Needs {
            mutating: true,
            camera: true,
        };
        let message = validate(&broken, needs).unwrap_err().to_string();
        assert!(message.contains("ROLLCALL_BASE_URL"));
        assert!(message.contains("csrftoken"));
        assert!(message.contains("/dev/video99"));
    }
}
