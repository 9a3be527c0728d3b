//! rollcall-core — Capture-modal state machine and attendance toggle.
//!
//! Pure domain logic for the biometric-attendance capture client: the
//! modal session state machine emits effects that the application layer
//! interprets against the camera and network ports defined here.

pub mod modal;
pub mod ports;
pub mod toggle;
pub mod types;

pub use modal::{CaptureModal, Effect, Intent, ModalState, Outcome};
pub use ports::{
    AttendanceSink, CameraError, CameraPort, CameraReleaseSignal, NetError, PhotoUploader,
    PreferenceStore, PrefsError,
};
pub use toggle::{AttendanceToggle, FACE_RECOGNITION_KEY};
pub use types::{AttendanceMode, PhotoRef, Snapshot};
