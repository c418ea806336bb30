//! Uploads into the player's gaming media library.

use std::path::PathBuf;

use playkit_bridge::UrlOpener;
use playkit_core::Session;
use playkit_dialogs::{GamingServiceController, ServiceType};
use playkit_graph::decode::string_value;
use playkit_graph::{GraphConnection, GraphRequest, HttpMethod};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::UploadError;
use crate::source::FileChunkSource;
use crate::video::{ProgressCallback, VideoUploadResult, VideoUploader};

#[derive(Debug, Clone)]
pub struct VideoUploadConfig {
    pub video_path: PathBuf,
}

impl VideoUploadConfig {
    pub fn new(video_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: video_path.into(),
        }
    }
}

/// Uploads a video file to `me/videos` with the chunked protocol.
pub struct GamingVideoUploader<'a> {
    conn: &'a dyn GraphConnection,
}

impl<'a> GamingVideoUploader<'a> {
    pub fn new(conn: &'a dyn GraphConnection) -> Self {
        Self { conn }
    }

    /// An upload the server reports as unsuccessful is an error.
    pub async fn upload_video(
        &self,
        session: &Session,
        config: &VideoUploadConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<VideoUploadResult, UploadError> {
        if session.access_token().is_none() {
            return Err(UploadError::MissingAccessToken("videos"));
        }

        let size = tokio::fs::metadata(&config.video_path).await?.len();
        if size == 0 {
            return Err(UploadError::EmptyVideo);
        }
        let name = config
            .video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut uploader = VideoUploader::new(self.conn, name, size);
        if let Some(progress) = progress {
            uploader = uploader.on_progress(progress);
        }
        let result = uploader
            .upload(session, &FileChunkSource::new(&config.video_path))
            .await?;
        if !result.success {
            return Err(UploadError::Unsuccessful);
        }
        Ok(result)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageUploadConfig {
    /// PNG-encoded image.
    pub image: Vec<u8>,
    pub caption: Option<String>,
    /// Open the media asset viewer on the uploaded image.
    pub should_launch_media_dialog: bool,
}

#[derive(Debug)]
pub enum ImageUploadOutcome {
    /// The `me/photos` response.
    Uploaded(Value),
    /// The media dialog is open; its controller completes with the
    /// `me/photos` response once the player returns.
    MediaDialog(GamingServiceController),
}

/// Uploads an image to `me/photos`.
pub struct GamingImageUploader<'a> {
    conn: &'a dyn GraphConnection,
}

impl<'a> GamingImageUploader<'a> {
    pub fn new(conn: &'a dyn GraphConnection) -> Self {
        Self { conn }
    }

    pub async fn upload_image(
        &self,
        session: &Session,
        config: ImageUploadConfig,
        opener: &dyn UrlOpener,
    ) -> Result<ImageUploadOutcome, UploadError> {
        if session.access_token().is_none() {
            return Err(UploadError::MissingAccessToken("images"));
        }
        if config.image.is_empty() {
            return Err(UploadError::EmptyImage);
        }

        let request = GraphRequest::for_session(session, "me/photos")
            .method(HttpMethod::Post)
            .param("caption", config.caption.unwrap_or_default())
            .attachment("picture", "picture.png", "image/png", config.image);
        let result = self.conn.start(request).await.map_err(|e| {
            warn!(error = %e, "image upload failed");
            UploadError::ImageUploadFailed(e)
        })?;

        let id = result.get("id").and_then(string_value).unwrap_or_default();
        info!(id = %id, "image uploaded");
        if !config.should_launch_media_dialog {
            return Ok(ImageUploadOutcome::Uploaded(result));
        }

        let mut controller = GamingServiceController::new(ServiceType::MediaAsset, result);
        controller.call(&id, opener).await?;
        Ok(ImageUploadOutcome::MediaDialog(controller))
    }
}
