//! Attendance event reporting.

use crate::client::ApiClient;
use rollcall_core::{AttendanceMode, AttendanceSink, NetError};
use serde::Serialize;

/// Per-student attendance endpoint.
pub fn attendance_path(lrn: &str) -> String {
    format!("/update_attendance/{lrn}/")
}

/// Wire body: mutually exclusive direction flags. The server is
/// authoritative for timestamping and storage.
#[derive(Debug, Serialize)]
struct AttendanceBody {
    time_in: bool,
    time_out: bool,
}

/// Submits one attendance event per call. Telemetry-class: the caller
/// logs a failure and moves on; there is no retry.
#[derive(Debug, Clone)]
pub struct AttendanceReporter {
    api: ApiClient,
}

impl AttendanceReporter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl AttendanceSink for AttendanceReporter {
    async fn report(&self, lrn: &str, mode: AttendanceMode) -> Result<(), NetError> {
        let (time_in, time_out) = mode.flags();
        let response = self
            .api
            .post(&attendance_path(lrn))?
            .json(&AttendanceBody { time_in, time_out })
            .send()
            .await
            .map_err(|e| NetError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::Status(status.as_u16()));
        }
        tracing::info!(lrn, %mode, "attendance reported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_embeds_the_student_id() {
        assert_eq!(attendance_path("123456"), "/update_attendance/123456/");
    }

    #[test]
    fn body_flags_follow_the_mode() {
        let (time_in, time_out) = AttendanceMode::TimeOut.flags();
        let body = serde_json::to_value(AttendanceBody { time_in, time_out }).unwrap();
        assert_eq!(body["time_in"], false);
        assert_eq!(body["time_out"], true);
    }
}
