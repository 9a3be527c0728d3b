//! Capture-modal state machine.
//!
//! Pure: inputs are operator intents and camera/upload outcomes, the
//! output is an ordered list of effects for the session controller to
//! perform. Invalid inputs for the current state produce no effects and
//! leave the state unchanged, so a double-clicked control or a stale
//! callback can never corrupt a session.

use crate::types::{PhotoRef, Snapshot};

/// Session states.
///
/// `Opening` covers the camera-acquisition suspension point and, after a
/// permission denial, the inert open modal with no stream bound.
/// `Saving` is `Captured` with an upload in flight; it gates re-entrant
/// save and recapture until the upload resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Opening,
    Live,
    Captured,
    Saving,
}

/// Operator inputs. `OutsideClick` and `PageHide` are distinct intents
/// that must produce the same effect set as an explicit `Close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Open,
    Capture,
    Recapture,
    Save,
    Close,
    OutsideClick,
    PageHide,
}

/// Resolutions of the two asynchronous operations the modal waits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CameraGranted,
    CameraDenied,
    SnapshotTaken(Snapshot),
    UploadDone(PhotoRef),
    UploadFailed,
}

/// Effects for the controller, in execution order. `ReleaseCamera` is
/// always emitted before `HideModal` so the device is free before the
/// modal reports closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowModal,
    AcquireCamera,
    NotifyCameraDenied,
    PresentLive,
    TakeSnapshot,
    PresentStill { data_url: String },
    Upload { lrn: String, snapshot: Snapshot },
    PublishPreview { path: String },
    ReleaseCamera,
    SignalServerRelease,
    HideModal,
}

/// One capture session. Constructed fresh per open and discarded on
/// close; the snapshot and canonical photo reference never leak across
/// sessions.
#[derive(Debug)]
pub struct CaptureModal {
    lrn: String,
    state: ModalState,
    snapshot: Option<Snapshot>,
    photo: Option<PhotoRef>,
}

impl CaptureModal {
    pub fn new(lrn: impl Into<String>) -> Self {
        Self {
            lrn: lrn.into(),
            state: ModalState::Closed,
            snapshot: None,
            photo: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Canonical photo reference; populated only after a successful
    /// upload and cleared again when the session closes.
    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }

    pub fn handle(&mut self, intent: Intent) -> Vec<Effect> {
        match (self.state, intent) {
            (ModalState::Closed, Intent::Open) => {
                self.state = ModalState::Opening;
                vec![Effect::ShowModal, Effect::AcquireCamera]
            }
            (ModalState::Live, Intent::Capture) => {
                vec![Effect::TakeSnapshot]
            }
            (ModalState::Captured, Intent::Recapture) => {
                self.snapshot = None;
                self.state = ModalState::Live;
                vec![Effect::PresentLive]
            }
            (ModalState::Captured, Intent::Save) => match &self.snapshot {
                Some(snapshot) if !snapshot.is_empty() => {
                    self.state = ModalState::Saving;
                    vec![Effect::Upload {
                        lrn: self.lrn.clone(),
                        snapshot: snapshot.clone(),
                    }]
                }
                // Missing snapshot: no-op, not an error. No network call.
                _ => Vec::new(),
            },
            (state, Intent::Close | Intent::OutsideClick | Intent::PageHide)
                if state != ModalState::Closed =>
            {
                self.close()
            }
            _ => Vec::new(),
        }
    }

    pub fn resolve(&mut self, outcome: Outcome) -> Vec<Effect> {
        match (self.state, outcome) {
            (ModalState::Opening, Outcome::CameraGranted) => {
                self.state = ModalState::Live;
                vec![Effect::PresentLive]
            }
            (ModalState::Opening, Outcome::CameraDenied) => {
                // Session stays inactive with the modal open; no retry.
                // Only a close intent gets the operator out.
                vec![Effect::NotifyCameraDenied]
            }
            (ModalState::Live, Outcome::SnapshotTaken(snapshot)) => {
                let data_url = snapshot.data_url();
                self.snapshot = Some(snapshot);
                self.state = ModalState::Captured;
                vec![Effect::PresentStill { data_url }]
            }
            (ModalState::Saving, Outcome::UploadDone(photo)) => {
                let path = photo.preview_path();
                self.photo = Some(photo);
                let mut effects = vec![Effect::PublishPreview { path }];
                effects.extend(self.close());
                effects
            }
            (ModalState::Saving, Outcome::UploadFailed) => {
                // The unsaved snapshot is never discarded by a failed
                // upload; the session drops back to Captured.
                self.state = ModalState::Captured;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Every exit path funnels through here: release the device, signal
    /// the server, hide, and clear all per-session state. Release comes
    /// first so the modal never reports closed with the camera held.
    fn close(&mut self) -> Vec<Effect> {
        self.state = ModalState::Closed;
        self.snapshot = None;
        self.photo = None;
        vec![
            Effect::ReleaseCamera,
            Effect::SignalServerRelease,
            Effect::HideModal,
        ]
    }
}
