use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Captured photos are always uploaded as JPEG.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Server directory that temporary student photos are published under.
pub const TEMP_PHOTO_DIR: &str = "/media/student_temp";

/// An in-memory raster snapshot, already JPEG-encoded, plus its pixel
/// dimensions. Exists only between a capture action and the next
/// recapture or modal close; never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    /// Upload filename derived from the learner reference number,
    /// e.g. `"123456.jpg"`.
    pub fn file_name(lrn: &str) -> String {
        format!("{lrn}.{PHOTO_EXTENSION}")
    }

    /// Inline data-URL form of the snapshot, used for the frozen still
    /// view while the photo is only held in memory.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.jpeg))
    }
}

/// Canonical server-assigned photo reference, returned after a successful
/// upload. Authoritative over any client-derived filename guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub file_name: String,
}

impl PhotoRef {
    /// Extract the canonical filename from the server's returned path
    /// (last path segment).
    pub fn from_server_path(file_path: &str) -> Self {
        let file_name = file_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { file_name }
    }

    /// Path the photo preview should be pointed at.
    pub fn preview_path(&self) -> String {
        format!("{TEMP_PHOTO_DIR}/{}", self.file_name)
    }
}

/// Attendance event direction. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceMode {
    TimeIn,
    TimeOut,
}

impl AttendanceMode {
    /// The `(time_in, time_out)` flag pair sent on the wire. Exactly one
    /// flag is set.
    pub fn flags(self) -> (bool, bool) {
        match self {
            AttendanceMode::TimeIn => (true, false),
            AttendanceMode::TimeOut => (false, true),
        }
    }
}

impl fmt::Display for AttendanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceMode::TimeIn => write!(f, "time-in"),
            AttendanceMode::TimeOut => write!(f, "time-out"),
        }
    }
}

impl FromStr for AttendanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time-in" => Ok(AttendanceMode::TimeIn),
            "time-out" => Ok(AttendanceMode::TimeOut),
            other => Err(format!("unknown attendance mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn file_name_appends_jpg_extension() {
        assert_eq!(Snapshot::file_name("123456"), "123456.jpg");
    }

    #[test]
    fn data_url_has_jpeg_prefix() {
        let url = snapshot().data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(url, "data:image/jpeg;base64,/9j/2Q==");
    }

    #[test]
    fn empty_snapshot_is_empty() {
        let snap = Snapshot {
            jpeg: Vec::new(),
            width: 0,
            height: 0,
        };
        assert!(snap.is_empty());
        assert!(!snapshot().is_empty());
    }

    #[test]
    fn canonical_name_is_last_path_segment() {
        let photo = PhotoRef::from_server_path("/media/student_temp/123456.jpg");
        assert_eq!(photo.file_name, "123456.jpg");
        assert_eq!(photo.preview_path(), "/media/student_temp/123456.jpg");
    }

    #[test]
    fn canonical_name_without_directories() {
        let photo = PhotoRef::from_server_path("123456.jpg");
        assert_eq!(photo.file_name, "123456.jpg");
    }

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        assert_eq!(AttendanceMode::TimeIn.flags(), (true, false));
        assert_eq!(AttendanceMode::TimeOut.flags(), (false, true));
    }

    #[test]
    fn mode_round_trips_through_display() {
        for mode in [AttendanceMode::TimeIn, AttendanceMode::TimeOut] {
            assert_eq!(mode.to_string().parse::<AttendanceMode>(), Ok(mode));
        }
        assert!("lunch".parse::<AttendanceMode>().is_err());
    }
}
