//! rollcall-net — HTTP clients for the school-management endpoints.
//!
//! All mutating requests carry the CSRF token read from the cookie jar
//! as an `X-CSRFToken` header. Upload failures are reported to the
//! caller; attendance reports and the server camera-release signal are
//! best-effort and log-only.

pub mod attendance;
pub mod client;
pub mod cookie;
pub mod release;
pub mod upload;

pub use attendance::AttendanceReporter;
pub use client::ApiClient;
pub use cookie::{CookieJar, CSRF_COOKIE};
pub use release::ReleaseClient;
pub use upload::UploadClient;
