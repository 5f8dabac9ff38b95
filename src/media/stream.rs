//! Byte-range aware file responses.
//!
//! A [`MediaFile`] owns one open handle for the lifetime of a single
//! response. The body is pulled chunk by chunk; when the client goes away the
//! body is dropped together with the handle.

use super::range::{parse_range, ByteRange};
use crate::error::{Result, VidlibError};
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, warn};

const CHUNK_SIZE: u64 = 64 * 1024;

/// How a request maps onto a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPlan {
    Full,
    Partial(ByteRange),
    Unsatisfiable,
}

impl StreamPlan {
    /// Plan a response from an optional `Range` header. Only the first
    /// requested range is served.
    pub fn from_header(range: Option<&str>, size: u64) -> Self {
        match range.map(str::trim).filter(|r| !r.is_empty()) {
            None => StreamPlan::Full,
            Some(header) => match parse_range(header, size) {
                Ok(ranges) => ranges
                    .first()
                    .copied()
                    .map(StreamPlan::Partial)
                    .unwrap_or(StreamPlan::Unsatisfiable),
                Err(e) => {
                    debug!(error = %e, size, "Unsatisfiable range");
                    StreamPlan::Unsatisfiable
                }
            },
        }
    }
}

/// An open file ready to be streamed.
#[derive(Debug)]
pub struct MediaFile {
    path: PathBuf,
    file: File,
    size: u64,
    modified: SystemTime,
}

impl MediaFile {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await?;
        let meta = file.metadata().await?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            size: meta.len(),
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// `"<mtime-hex>-<size-hex>"`, stable while the file is unchanged.
    pub fn etag(&self) -> String {
        let secs = self
            .modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("\"{:x}-{:x}\"", secs, self.size)
    }

    /// Modification time as an IMF-fixdate.
    pub fn last_modified(&self) -> String {
        let modified: DateTime<Utc> = self.modified.into();
        modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// Build the response for `plan`. `extra` headers (content type, caching)
    /// are added to every status, including 416.
    pub async fn respond(mut self, plan: StreamPlan, extra: HeaderMap) -> Result<Response> {
        let mut headers = extra;
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        headers.insert(header::ETAG, header_value(&self.etag())?);
        headers.insert(header::LAST_MODIFIED, header_value(&self.last_modified())?);

        let (status, body) = match plan {
            StreamPlan::Full => {
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.size));
                let transfer = Transfer::new(self.file, self.path, self.size);
                (StatusCode::OK, Body::from_stream(transfer.into_stream()))
            }
            StreamPlan::Partial(range) => {
                headers.insert(
                    header::CONTENT_RANGE,
                    header_value(&range.content_range(self.size))?,
                );
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.len()));
                self.file.seek(SeekFrom::Start(range.start())).await?;
                let transfer = Transfer::new(self.file, self.path, range.len());
                (
                    StatusCode::PARTIAL_CONTENT,
                    Body::from_stream(transfer.into_stream()),
                )
            }
            StreamPlan::Unsatisfiable => {
                headers.insert(
                    header::CONTENT_RANGE,
                    header_value(&format!("bytes */{}", self.size))?,
                );
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(0u64));
                (StatusCode::RANGE_NOT_SATISFIABLE, Body::empty())
            }
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| VidlibError::InvalidInput(format!("Invalid header value {:?}: {}", value, e)))
}

/// Bounded read over an open file. Logs when dropped before the window is sent.
struct Transfer {
    file: File,
    path: PathBuf,
    total: u64,
    remaining: u64,
    done: bool,
}

impl Transfer {
    fn new(file: File, path: PathBuf, total: u64) -> Self {
        Self {
            file,
            path,
            total,
            remaining: total,
            done: false,
        }
    }

    /// Stop streaming; the failure is already logged, so the drop guard stays quiet.
    fn finish(&mut self) {
        self.done = true;
    }

    fn into_stream(self) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
        futures::stream::unfold(self, |mut t| async move {
            if t.done || t.remaining == 0 {
                return None;
            }

            let mut buf = vec![0u8; t.remaining.min(CHUNK_SIZE) as usize];
            match t.file.read(&mut buf).await {
                Ok(0) => {
                    warn!(path = %t.path.display(), remaining = t.remaining, "File ended before range was sent");
                    t.finish();
                    None
                }
                Ok(n) => {
                    buf.truncate(n);
                    t.remaining -= n as u64;
                    Some((Ok(Bytes::from(buf)), t))
                }
                Err(e) => {
                    warn!(path = %t.path.display(), error = %e, "Read failed while streaming");
                    t.finish();
                    Some((Err(e), t))
                }
            }
        })
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        if !self.done && self.remaining > 0 {
            debug!(
                path = %self.path.display(),
                sent = self.total - self.remaining,
                total = self.total,
                "Client disconnected before transfer completed"
            );
        }
    }
}
