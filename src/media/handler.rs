use crate::error::MediaError;
use crate::media::path::{LogicalPath, PathError};
use crate::media::range::ByteRange;
use crate::media::store::ContentStore;
use crate::token::TokenVerifier;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Read buffer size for streamed bodies
pub const CHUNK_SIZE: usize = 64 * 1024;

pub const CACHE_CONTROL: &str = "private, no-store, max-age=0";

/// Lazily read, bounded slice of a file. Dropping it closes the file.
pub type MediaStream = ReaderStream<Take<File>>;

/// MIME type by file extension; unknown extensions are served as octet-stream
pub fn content_type_for(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" | "qt" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Outcome of a successful media request
#[derive(Debug)]
pub struct StreamResponse {
    pub content_type: &'static str,
    pub file_size: u64,
    /// Present for partial content
    pub range: Option<ByteRange>,
    pub body: MediaStream,
}

impl StreamResponse {
    pub fn status(&self) -> StatusCode {
        if self.range.is_some() {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        }
    }

    pub fn content_length(&self) -> u64 {
        match self.range {
            Some(range) => range.len(),
            None => self.file_size,
        }
    }
}

impl IntoResponse for StreamResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let content_length = self.content_length();
        let content_range = self.range.map(|range| range.content_range(self.file_size));

        let mut res = Response::new(Body::from_stream(self.body));
        *res.status_mut() = status;

        let headers = res.headers_mut();
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL),
        );
        if let Some(content_range) = content_range
            && let Ok(value) = HeaderValue::from_str(&content_range)
        {
            headers.insert(header::CONTENT_RANGE, value);
        }

        res
    }
}

/// Verifies credentials and streams the file they point at.
///
/// Every call is authenticated on its own; nothing is kept between requests.
#[derive(Clone)]
pub struct StreamHandler {
    verifier: TokenVerifier,
    store: ContentStore,
}

impl StreamHandler {
    pub fn new(verifier: TokenVerifier, store: ContentStore) -> Self {
        Self { verifier, store }
    }

    pub async fn serve(
        &self,
        token: Option<&str>,
        range_header: Option<&str>,
    ) -> Result<StreamResponse, MediaError> {
        let Some(token) = token else {
            debug!("Media request without token");
            return Err(MediaError::Unauthorized);
        };

        let payload = self.verifier.verify(token).map_err(|error| {
            debug!(reason = %error, "Rejected media token");
            MediaError::from(error)
        })?;

        let path = LogicalPath::parse(&payload.path).map_err(|error| match error {
            PathError::Empty => MediaError::NotFound,
            PathError::Malformed | PathError::Escape => {
                debug!(%error, "Token path rejected");
                MediaError::Forbidden
            }
        })?;

        let resolved = self.store.resolve(&path).await?;
        let content_type = content_type_for(path.as_str());
        let file_size = resolved.size;

        let (range, start, len) = match range_header {
            Some(header) => {
                let range = ByteRange::parse(header, file_size)?;
                (Some(range), range.start, range.len())
            }
            None => (None, 0, file_size),
        };

        let mut file = resolved.file;
        if start > 0 {
            file.seek(SeekFrom::Start(start)).await.map_err(|error| {
                error!(path = %path.as_str(), ?error, "Failed to seek media file");
                MediaError::Internal
            })?;
        }

        debug!(path = %path.as_str(), ?range, file_size, "Serving media");

        Ok(StreamResponse {
            content_type,
            file_size,
            range,
            body: ReaderStream::with_capacity(file.take(len), CHUNK_SIZE),
        })
    }
}
