//! Capture-session controller.
//!
//! Feeds operator intents into the modal state machine and interprets
//! the returned effects, in order, against the camera, uploader, and
//! release-signal ports. The machine decides; this layer only executes,
//! so camera release always lands before the modal reports closed, and
//! a failed upload leaves the captured still (and its snapshot) intact.

use rollcall_core::{
    CameraPort, CameraReleaseSignal, CaptureModal, Effect, Intent, ModalState, Outcome,
    PhotoUploader,
};
use std::collections::VecDeque;

/// What the operator currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Hidden,
    /// Modal shown, camera not (or no longer) bound.
    Opening,
    Live,
    Still { data_url: String },
}

pub struct CaptureSession<C, U, R> {
    modal: CaptureModal,
    camera: C,
    uploader: U,
    release_signal: R,
    view: View,
    preview_ref: Option<String>,
    notice: Option<String>,
}

impl<C, U, R> CaptureSession<C, U, R>
where
    C: CameraPort,
    U: PhotoUploader,
    R: CameraReleaseSignal,
{
    pub fn new(lrn: impl Into<String>, camera: C, uploader: U, release_signal: R) -> Self {
        Self {
            modal: CaptureModal::new(lrn),
            camera,
            uploader,
            release_signal,
            view: View::Hidden,
            preview_ref: None,
            notice: None,
        }
    }

    pub async fn open(&mut self) {
        self.intend(Intent::Open).await;
    }

    pub async fn capture(&mut self) {
        self.intend(Intent::Capture).await;
    }

    pub async fn recapture(&mut self) {
        self.intend(Intent::Recapture).await;
    }

    pub async fn save(&mut self) {
        self.intend(Intent::Save).await;
    }

    pub async fn close(&mut self) {
        self.intend(Intent::Close).await;
    }

    pub async fn outside_click(&mut self) {
        self.intend(Intent::OutsideClick).await;
    }

    pub async fn page_hide(&mut self) {
        self.intend(Intent::PageHide).await;
    }

    pub fn state(&self) -> ModalState {
        self.modal.state()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The published photo preview path. Survives session close: it is
    /// the student page's new preview reference, not modal state.
    pub fn preview_ref(&self) -> Option<&str> {
        self.preview_ref.as_deref()
    }

    /// Pending user-visible notice, if any (camera permission denial).
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    async fn intend(&mut self, intent: Intent) {
        let effects = self.modal.handle(intent);
        self.run_effects(effects).await;
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ShowModal => self.view = View::Opening,
                Effect::AcquireCamera => {
                    let outcome = match self.camera.acquire() {
                        Ok(()) => Outcome::CameraGranted,
                        Err(e) => {
                            tracing::error!(error = %e, "camera acquisition failed");
                            Outcome::CameraDenied
                        }
                    };
                    enqueue_front(&mut queue, self.modal.resolve(outcome));
                }
                Effect::NotifyCameraDenied => {
                    self.notice =
                        Some("Unable to access camera. Please check permissions.".to_string());
                }
                Effect::PresentLive => self.view = View::Live,
                Effect::TakeSnapshot => match self.camera.snapshot() {
                    Ok(snapshot) => {
                        enqueue_front(
                            &mut queue,
                            self.modal.resolve(Outcome::SnapshotTaken(snapshot)),
                        );
                    }
                    // No frame, no transition; the feed stays live.
                    Err(e) => tracing::warn!(error = %e, "snapshot failed"),
                },
                Effect::PresentStill { data_url } => self.view = View::Still { data_url },
                Effect::Upload { lrn, snapshot } => {
                    let outcome = match self.uploader.upload(&lrn, &snapshot).await {
                        Ok(photo) => Outcome::UploadDone(photo),
                        Err(e) => {
                            tracing::error!(error = %e, "photo upload failed");
                            Outcome::UploadFailed
                        }
                    };
                    enqueue_front(&mut queue, self.modal.resolve(outcome));
                }
                Effect::PublishPreview { path } => {
                    tracing::info!(preview = %path, "photo preview updated");
                    self.preview_ref = Some(path);
                }
                Effect::ReleaseCamera => self.camera.release(),
                Effect::SignalServerRelease => self.release_signal.fire(),
                Effect::HideModal => self.view = View::Hidden,
            }
        }
    }
}

/// Queue resolved effects ahead of whatever is still pending, keeping
/// their own order.
fn enqueue_front(queue: &mut VecDeque<Effect>, effects: Vec<Effect>) {
    for effect in effects.into_iter().rev() {
        queue.push_front(effect);
    }
}
