//! rollcall-hw — Hardware abstraction for the capture camera.
//!
//! Provides V4L2-based exclusive camera sessions with a live preview
//! pump, plus the frame plumbing (YUYV decode, horizontal mirror, JPEG
//! encode) behind a snapshot.

pub mod camera;
pub mod frame;

pub use camera::{list_devices, CameraSession, DeviceInfo, PreviewSink};
pub use frame::RgbFrame;
