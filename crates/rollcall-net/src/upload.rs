//! Photo upload client.

use crate::client::ApiClient;
use reqwest::multipart;
use rollcall_core::{NetError, PhotoRef, PhotoUploader, Snapshot};
use serde::Deserialize;

/// Endpoint the captured photo is submitted to.
pub const UPLOAD_PATH: &str = "/school/upload-temp-photo/";

/// Server acknowledgement for a stored photo.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
    file_path: String,
}

/// Uploads a snapshot as a multipart form and interprets the server's
/// canonical filename.
#[derive(Debug, Clone)]
pub struct UploadClient {
    api: ApiClient,
}

impl UploadClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Submit the snapshot under `<lrn>.jpg`. An empty snapshot is a
    /// no-op: no request is issued and no photo reference is produced.
    pub async fn save(
        &self,
        lrn: &str,
        snapshot: &Snapshot,
    ) -> Result<Option<PhotoRef>, NetError> {
        if snapshot.is_empty() {
            return Ok(None);
        }

        let file_name = Snapshot::file_name(lrn);
        let photo_part = multipart::Part::bytes(snapshot.jpeg.clone())
            .file_name(file_name.clone())
            .mime_str("image/jpeg")
            .map_err(|e| NetError::Malformed(e.to_string()))?;
        let form = multipart::Form::new()
            .part("face_photo", photo_part)
            .text("student_lrn", lrn.to_string());

        let response = self
            .api
            .post(UPLOAD_PATH)?
            .multipart(form)
            .send()
            .await
            .map_err(|e| NetError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::Status(status.as_u16()));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| NetError::Malformed(e.to_string()))?;
        let photo = PhotoRef::from_server_path(&body.file_path);
        tracing::info!(lrn, file = %photo.file_name, "photo uploaded");
        Ok(Some(photo))
    }
}

impl PhotoUploader for UploadClient {
    async fn upload(&self, lrn: &str, snapshot: &Snapshot) -> Result<PhotoRef, NetError> {
        self.save(lrn, snapshot)
            .await?
            .ok_or_else(|| NetError::Malformed("empty snapshot".into()))
    }
}
