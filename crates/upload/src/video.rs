//! Three-phase chunked video upload.
//!
//! `start` opens an upload session and returns the first byte window,
//! every `transfer` sends one window and receives the next, and `finish`
//! closes the session once the server reports an empty window.

use playkit_core::Session;
use playkit_graph::decode::{bool_value, u64_value};
use playkit_graph::{GraphConnection, GraphRequest, HttpMethod, ParamValue};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::source::ChunkSource;

const DEFAULT_GRAPH_NODE: &str = "me";
const CHUNK_CONTENT_TYPE: &str = "application/octet-stream";

/// Progress after each transferred chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes in the chunk just sent.
    pub bytes_sent: u64,
    pub total_bytes_sent: u64,
    pub total_expected: u64,
}

/// Callback invoked with upload progress.
pub type ProgressCallback = Box<dyn Fn(UploadProgress) + Send + Sync>;

/// Outcome of the finish phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUploadResult {
    pub success: bool,
    pub video_id: u64,
}

/// Uploads one video of known size through a [`GraphConnection`].
pub struct VideoUploader<'a> {
    conn: &'a dyn GraphConnection,
    video_name: String,
    video_size: u64,
    graph_node: String,
    parameters: Vec<(String, ParamValue)>,
    progress: Option<ProgressCallback>,
}

struct UploadSessionIds {
    upload_session_id: u64,
    video_id: u64,
}

impl<'a> VideoUploader<'a> {
    pub fn new(conn: &'a dyn GraphConnection, video_name: impl Into<String>, video_size: u64) -> Self {
        Self {
            conn,
            video_name: video_name.into(),
            video_size,
            graph_node: DEFAULT_GRAPH_NODE.to_string(),
            parameters: Vec::new(),
            progress: None,
        }
    }

    /// Uploads to `{node}/videos` instead of `me/videos`.
    pub fn graph_node(mut self, node: impl Into<String>) -> Self {
        self.graph_node = node.into();
        self
    }

    /// Extra parameters sent with the finish phase (title, description...).
    pub fn parameter(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.parameters.push((name.to_string(), value.into()));
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn graph_path(&self) -> String {
        format!("{}/videos", self.graph_node)
    }

    fn request(&self, session: &Session, phase: &str) -> GraphRequest {
        GraphRequest::for_session(session, self.graph_path())
            .method(HttpMethod::Post)
            .param("upload_phase", phase)
    }

    /// Runs all three phases. Phases are sequential and nothing is retried.
    pub async fn upload(
        &self,
        session: &Session,
        source: &dyn ChunkSource,
    ) -> Result<VideoUploadResult, UploadError> {
        if self.video_size == 0 {
            return Err(UploadError::InvalidVideoSize(self.video_size));
        }

        let (ids, window) = self.start(session).await?;
        self.transfer(session, source, &ids, window).await?;
        self.finish(session, &ids).await
    }

    async fn start(&self, session: &Session) -> Result<(UploadSessionIds, (u64, u64)), UploadError> {
        let request = self
            .request(session, "start")
            .param("file_size", self.video_size);
        debug!(path = %request.path, size = self.video_size, "starting video upload");
        let response = self.conn.start(request).await?;

        let upload_session_id = response.get("upload_session_id").and_then(u64_value);
        let video_id = response.get("video_id").and_then(u64_value);
        let (Some(upload_session_id), Some(video_id)) = (upload_session_id, video_id) else {
            return Err(UploadError::MissingSessionIds);
        };

        let window = offsets(&response)?;
        Ok((
            UploadSessionIds {
                upload_session_id,
                video_id,
            },
            window,
        ))
    }

    async fn transfer(
        &self,
        session: &Session,
        source: &dyn ChunkSource,
        ids: &UploadSessionIds,
        (mut start, mut end): (u64, u64),
    ) -> Result<(), UploadError> {
        let mut total_bytes_sent = 0;
        while start != end {
            if end > self.video_size {
                warn!(start, end, size = self.video_size, "upload window past end of video");
                return Err(UploadError::ChunkUnavailable { start, end });
            }
            let chunk = match source.read_chunk(start, end).await {
                Ok(chunk) if chunk.len() as u64 == end - start => chunk,
                Ok(_) => return Err(UploadError::ChunkUnavailable { start, end }),
                Err(e) => {
                    warn!(error = %e, offset = start, "video chunk read failed");
                    return Err(UploadError::ChunkUnavailable { start, end });
                }
            };
            let bytes_sent = chunk.len() as u64;

            let request = self
                .request(session, "transfer")
                .param("start_offset", start)
                .param("upload_session_id", ids.upload_session_id)
                .attachment(
                    "video_file_chunk",
                    self.video_name.clone(),
                    CHUNK_CONTENT_TYPE,
                    chunk,
                );
            debug!(offset = start, end, "transferring video chunk");
            let response = self.conn.start(request).await?;

            total_bytes_sent += bytes_sent;
            if let Some(progress) = &self.progress {
                progress(UploadProgress {
                    bytes_sent,
                    total_bytes_sent,
                    total_expected: self.video_size,
                });
            }

            let (next_start, next_end) = offsets(&response)?;
            if next_start < end {
                return Err(UploadError::OffsetMovedBackwards {
                    start: next_start,
                    previous_end: end,
                });
            }
            start = next_start;
            end = next_end;
        }
        Ok(())
    }

    async fn finish(
        &self,
        session: &Session,
        ids: &UploadSessionIds,
    ) -> Result<VideoUploadResult, UploadError> {
        let mut request = self
            .request(session, "finish")
            .param("upload_session_id", ids.upload_session_id);
        for (name, value) in &self.parameters {
            request.set_param(name, value.clone());
        }
        let response = self.conn.start(request).await?;

        let success = response
            .get("success")
            .and_then(bool_value)
            .ok_or(UploadError::FinishFailed)?;
        info!(video_id = ids.video_id, success, "video upload finished");
        Ok(VideoUploadResult {
            success,
            video_id: ids.video_id,
        })
    }
}

/// `start_offset` and `end_offset`, as numbers or numeric strings.
fn offsets(response: &Value) -> Result<(u64, u64), UploadError> {
    let start = response.get("start_offset").and_then(u64_value);
    let end = response.get("end_offset").and_then(u64_value);
    let (Some(start), Some(end)) = (start, end) else {
        return Err(UploadError::InvalidOffsets);
    };
    if start > end {
        return Err(UploadError::StartAfterEnd);
    }
    Ok((start, end))
}
