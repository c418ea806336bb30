use playkit_dialogs::DialogError;
use playkit_graph::GraphError;

/// Errors produced by the upload crate.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid video size: {0}")]
    InvalidVideoSize(u64),

    #[error("Failed to get valid upload_session_id or video_id.")]
    MissingSessionIds,

    #[error("Fail to get valid start_offset or end_offset.")]
    InvalidOffsets,

    #[error("Invalid offset: start_offset is greater than end_offset.")]
    StartAfterEnd,

    #[error("Invalid offset: start_offset {start} is before the previous end_offset {previous_end}.")]
    OffsetMovedBackwards { start: u64, previous_end: u64 },

    #[error("Fail to get video chunk with start offset: {start}, end offset: {end}.")]
    ChunkUnavailable { start: u64, end: u64 },

    #[error("Failed to finish uploading.")]
    FinishFailed,

    #[error("A valid access token is required to upload {0}")]
    MissingAccessToken(&'static str),

    #[error("Attempting to upload an empty video file")]
    EmptyVideo,

    #[error("Attempting to upload an empty image")]
    EmptyImage,

    #[error("Video upload was unsuccessful, but no error was thrown.")]
    Unsuccessful,

    #[error("Image upload failed: {0}")]
    ImageUploadFailed(#[source] GraphError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
