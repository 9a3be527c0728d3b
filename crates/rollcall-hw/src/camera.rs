//! V4L2 camera session via the `v4l` crate.
//!
//! A session owns the device exclusively while acquired: a dedicated
//! pump thread decodes frames, feeds the preview sink, and keeps the
//! latest frame around for snapshots. Release is idempotent and joins
//! the pump before returning, so the device is free the moment it
//! completes.

use crate::frame::{self, RgbFrame};
use rollcall_core::{CameraError, CameraPort, Snapshot};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

/// Preferred capture resolution; the driver may negotiate down.
const REQUESTED_WIDTH: u32 = 1280;
const REQUESTED_HEIGHT: u32 = 720;

/// Consecutive dequeue failures before the pump gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 30;

/// Receives decoded preview frames while a session is live.
pub trait PreviewSink: Send + Sync {
    fn present(&self, frame: &RgbFrame);
}

/// Info about a discovered V4L2 device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
    pub driver: String,
    pub bus: String,
}

/// Exclusive camera session bound to a preview sink.
pub struct CameraSession {
    device_path: String,
    sink: Arc<dyn PreviewSink>,
    active: Option<ActiveStream>,
}

struct ActiveStream {
    stop: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<RgbFrame>>>,
    pump: Option<JoinHandle<()>>,
}

impl CameraSession {
    pub fn new(device_path: impl Into<String>, sink: Arc<dyn PreviewSink>) -> Self {
        Self {
            device_path: device_path.into(),
            sink,
            active: None,
        }
    }
}

impl CameraPort for CameraSession {
    fn acquire(&mut self) -> Result<(), CameraError> {
        if self.active.is_some() {
            // Protocol violation: callers must release before reacquiring.
            // The new stream replaces the old one.
            tracing::warn!(
                device = %self.device_path,
                "acquire while a stream is active; releasing the old stream"
            );
            self.release();
        }

        let device_path = self.device_path.clone();
        if !Path::new(&device_path).exists() {
            return Err(CameraError::NotFound(device_path));
        }

        let device =
            Device::with_path(&device_path).map_err(|e| map_open_error(&device_path, &e))?;

        let caps = device
            .query_caps()
            .map_err(|e| CameraError::Capture(format!("failed to query capabilities: {e}")))?;
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            return Err(CameraError::Format("device cannot capture video".into()));
        }

        tracing::info!(
            device = %device_path,
            driver = %caps.driver,
            card = %caps.card,
            "opened camera"
        );

        let mut fmt = device
            .format()
            .map_err(|e| CameraError::Format(format!("failed to get format: {e}")))?;
        fmt.fourcc = FourCC::new(b"YUYV");
        fmt.width = REQUESTED_WIDTH;
        fmt.height = REQUESTED_HEIGHT;

        let negotiated = device
            .set_format(&fmt)
            .map_err(|e| CameraError::Format(format!("failed to set format: {e}")))?;
        if negotiated.fourcc != FourCC::new(b"YUYV") {
            return Err(CameraError::Format(format!(
                "unsupported pixel format: {:?} (need YUYV)",
                negotiated.fourcc
            )));
        }

        let (width, height) = (negotiated.width, negotiated.height);
        tracing::info!(width, height, "negotiated format");

        let stop = Arc::new(AtomicBool::new(false));
        let latest = Arc::new(Mutex::new(None));
        let pump = std::thread::Builder::new()
            .name("rollcall-preview".into())
            .spawn({
                let stop = Arc::clone(&stop);
                let latest = Arc::clone(&latest);
                let sink = Arc::clone(&self.sink);
                move || pump_frames(device, width, height, sink, stop, latest)
            })
            .map_err(|e| CameraError::Capture(format!("failed to spawn preview thread: {e}")))?;

        self.active = Some(ActiveStream {
            stop,
            latest,
            pump: Some(pump),
        });
        Ok(())
    }

    fn release(&mut self) {
        let Some(mut active) = self.active.take() else {
            return; // no active stream: no-op
        };
        active.stop.store(true, Ordering::Relaxed);
        if let Some(pump) = active.pump.take() {
            if pump.join().is_err() {
                tracing::error!("preview pump panicked");
            }
        }
        tracing::info!(device = %self.device_path, "camera released");
    }

    fn snapshot(&mut self) -> Result<Snapshot, CameraError> {
        let active = self.active.as_ref().ok_or(CameraError::Inactive)?;
        let mut frame = active
            .latest
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| CameraError::Capture("no frame available yet".into()))?;

        frame::mirror_rows(&mut frame.data, frame.width, frame.height);
        let jpeg =
            frame::encode_jpeg(&frame).map_err(|e| CameraError::Capture(e.to_string()))?;
        Ok(Snapshot {
            jpeg,
            width: frame.width,
            height: frame.height,
        })
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        // Last-resort release; every session exit path releases explicitly.
        self.release();
    }
}

/// Pump loop: dequeue, decode, present, retain.
fn pump_frames(
    device: Device,
    width: u32,
    height: u32,
    sink: Arc<dyn PreviewSink>,
    stop: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<RgbFrame>>>,
) {
    let mut stream = match MmapStream::with_buffers(&device, BufType::VideoCapture, 4) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "failed to create mmap stream");
            return;
        }
    };

    tracing::debug!("preview pump started");
    let mut consecutive_errors = 0u32;
    while !stop.load(Ordering::Relaxed) {
        let buf = match stream.next() {
            Ok((buf, _meta)) => {
                consecutive_errors = 0;
                buf
            }
            Err(e) => {
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    tracing::error!(error = %e, "too many dequeue failures, stopping pump");
                    return;
                }
                tracing::warn!(error = %e, "failed to dequeue frame");
                continue;
            }
        };

        match frame::yuyv_to_rgb(buf, width, height) {
            Ok(data) => {
                let frame = RgbFrame {
                    data,
                    width,
                    height,
                };
                sink.present(&frame);
                if let Ok(mut slot) = latest.lock() {
                    *slot = Some(frame);
                }
            }
            Err(e) => tracing::warn!(error = %e, "bad frame"),
        }
    }
    tracing::debug!("preview pump stopped");
}

fn map_open_error(path: &str, e: &std::io::Error) -> CameraError {
    match e.kind() {
        ErrorKind::PermissionDenied => CameraError::Denied(format!("{path}: {e}")),
        ErrorKind::NotFound => CameraError::NotFound(path.to_string()),
        _ if e.to_string().contains("busy") || e.to_string().contains("EBUSY") => {
            CameraError::Busy
        }
        _ => CameraError::Capture(format!("{path}: {e}")),
    }
}

/// List available V4L2 video capture devices.
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    for i in 0..16 {
        let path = format!("/dev/video{i}");
        if !Path::new(&path).exists() {
            continue;
        }
        let Ok(dev) = Device::with_path(&path) else {
            continue;
        };
        let Ok(caps) = dev.query_caps() else {
            continue;
        };
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            continue;
        }
        devices.push(DeviceInfo {
            path,
            name: caps.card.clone(),
            driver: caps.driver.clone(),
            bus: caps.bus.clone(),
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_mapping() {
        let denied = std::io::Error::new(ErrorKind::PermissionDenied, "EACCES");
        assert!(matches!(
            map_open_error("/dev/video0", &denied),
            CameraError::Denied(_)
        ));

        let missing = std::io::Error::new(ErrorKind::NotFound, "ENOENT");
        assert!(matches!(
            map_open_error("/dev/video0", &missing),
            CameraError::NotFound(_)
        ));

        let busy = std::io::Error::other("Device or resource busy (os error 16)");
        assert!(matches!(
            map_open_error("/dev/video0", &busy),
            CameraError::Busy
        ));

        let generic = std::io::Error::other("ioctl failed");
        assert!(matches!(
            map_open_error("/dev/video0", &generic),
            CameraError::Capture(_)
        ));
    }

    #[test]
    fn test_snapshot_requires_active_stream() {
        struct Discard;
        impl PreviewSink for Discard {
            fn present(&self, _frame: &RgbFrame) {}
        }

        let mut session = CameraSession::new("/dev/video99", Arc::new(Discard));
        assert!(!session.is_active());
        assert!(matches!(session.snapshot(), Err(CameraError::Inactive)));
        // Release with no active stream is a no-op.
        session.release();
        assert!(!session.is_active());
    }
}
