//! Port traits the application layer is wired through.
//!
//! The modal state machine never touches hardware or the network; the
//! session controller interprets its effects against these traits, so
//! every seam can be replaced by an in-memory fake under test.

use crate::types::{AttendanceMode, PhotoRef, Snapshot};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access denied: {0}")]
    Denied(String),
    #[error("device busy")]
    Busy,
    #[error("device not found: {0}")]
    NotFound(String),
    #[error("format negotiation failed: {0}")]
    Format(String),
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("no active stream")]
    Inactive,
}

#[derive(Debug, Error)]
pub enum NetError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("cookie jar has no csrf token")]
    MissingCsrf,
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference storage failed: {0}")]
    Storage(String),
}

/// Exclusive handle on the local camera device.
///
/// At most one stream may be active at any instant. `release` is
/// idempotent and must be called on every session exit path.
pub trait CameraPort {
    fn acquire(&mut self) -> Result<(), CameraError>;
    fn release(&mut self);
    /// Grab the latest frame at the feed's native resolution, mirrored
    /// horizontally, as an encoded snapshot. Valid only while active.
    fn snapshot(&mut self) -> Result<Snapshot, CameraError>;
    fn is_active(&self) -> bool;
}

/// Submits a captured photo and yields the server's canonical reference.
#[allow(async_fn_in_trait)]
pub trait PhotoUploader {
    async fn upload(&self, lrn: &str, snapshot: &Snapshot) -> Result<PhotoRef, NetError>;
}

/// Best-effort notification that the server should free any camera
/// resource it holds. Fire-and-forget: implementations log failures and
/// never block the caller.
pub trait CameraReleaseSignal {
    fn fire(&self);
}

/// Submits a single attendance event. Telemetry-class: callers log
/// failures and move on, no retry.
#[allow(async_fn_in_trait)]
pub trait AttendanceSink {
    async fn report(&self, lrn: &str, mode: AttendanceMode) -> Result<(), NetError>;
}

/// Durable string key/value storage for client preferences.
/// Last-write-wins, no merge.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}
