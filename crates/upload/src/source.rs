use std::future::Future;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Future returned by [`ChunkSource::read_chunk`].
pub type ChunkFuture<'a> = Pin<Box<dyn Future<Output = std::io::Result<Vec<u8>>> + Send + 'a>>;

/// Supplies the bytes of a video by offset range.
///
/// A read may return fewer bytes than requested when the range runs past
/// the end of the data; the uploader treats that as a failure.
pub trait ChunkSource: Send + Sync {
    fn read_chunk(&self, start: u64, end: u64) -> ChunkFuture<'_>;
}

/// Reads chunks from a file on the blocking pool.
#[derive(Debug, Clone)]
pub struct FileChunkSource {
    path: PathBuf,
}

impl FileChunkSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSource for FileChunkSource {
    fn read_chunk(&self, start: u64, end: u64) -> ChunkFuture<'_> {
        let path = self.path.clone();
        let len = end.saturating_sub(start);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut file = std::fs::File::open(&path)?;
                let len = len.min(file.metadata()?.len().saturating_sub(start));
                file.seek(SeekFrom::Start(start))?;
                let mut buf = Vec::new();
                file.take(len).read_to_end(&mut buf)?;
                Ok(buf)
            })
            .await
            .map_err(std::io::Error::other)?
        })
    }
}

impl ChunkSource for Vec<u8> {
    fn read_chunk(&self, start: u64, end: u64) -> ChunkFuture<'_> {
        let len = self.len() as u64;
        let (start, end) = (start.min(len) as usize, end.min(len) as usize);
        let chunk = self[start..end.max(start)].to_vec();
        Box::pin(async move { Ok(chunk) })
    }
}
