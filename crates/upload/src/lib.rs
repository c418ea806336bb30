//! Media uploads to the player's gaming library.
//!
//! Videos go through the three-phase chunked protocol against
//! `{node}/videos`; images are a single multipart POST to `me/photos`.

mod error;
mod gaming;
mod source;
mod video;

pub use error::UploadError;
pub use gaming::{
    GamingImageUploader, GamingVideoUploader, ImageUploadConfig, ImageUploadOutcome,
    VideoUploadConfig,
};
pub use source::{ChunkFuture, ChunkSource, FileChunkSource};
pub use video::{ProgressCallback, UploadProgress, VideoUploadResult, VideoUploader};
