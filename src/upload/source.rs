/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::upload::errors::UploadError;
use crate::upload::options::UploadOptions;
use bytes::Bytes;
use reqwest::multipart::Part;
use std::path::{Path, PathBuf};
use strum_macros::IntoStaticStr;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Name of the form field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Where the photo bytes come from.
///
/// The variant decides how the `photo` part is built: buffers are sniffed for
/// their image type, streams are passed through untouched and paths are opened
/// and streamed with the file name as the part's filename.
#[derive(IntoStaticStr)]
pub enum PhotoSource {
    #[strum(serialize = "buffer")]
    Buffer(Bytes),

    #[strum(serialize = "stream")]
    Stream {
        body: reqwest::Body,
        length: Option<u64>,
    },

    #[strum(serialize = "path")]
    Path(PathBuf),
}

impl PhotoSource {
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        PhotoSource::Buffer(data.into())
    }

    /// Wraps a stream of byte chunks. Pass `length` if the total size is known.
    pub fn from_stream<S>(stream: S, length: Option<u64>) -> Self
    where
        S: futures::TryStream + Send + Sync + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        PhotoSource::Stream {
            body: reqwest::Body::wrap_stream(stream),
            length,
        }
    }

    pub fn from_reader<R>(reader: R, length: Option<u64>) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self::from_stream(ReaderStream::new(reader), length)
    }

    /// Streams the body of an in-flight HTTP response, e.g. re-uploading a downloaded image
    pub fn from_response(response: reqwest::Response) -> Self {
        let length = response.content_length();
        PhotoSource::Stream {
            body: reqwest::Body::from(response),
            length,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        PhotoSource::Path(path.as_ref().to_path_buf())
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Resolves the photo into the pieces of a multipart file part.
    ///
    /// Any sniffing or file access happens here, before the form is assembled.
    pub(crate) async fn into_photo_part(
        self,
        options: &UploadOptions,
    ) -> Result<PhotoPart, UploadError> {
        match self {
            PhotoSource::Buffer(data) => {
                let sniffed = sniff(&data);
                let file_name = options.filename.clone().unwrap_or_else(|| match &sniffed {
                    Some((_, ext)) => format!("photo.{ext}"),
                    None => "photo".to_string(),
                });
                let mime_type = options.mime_type.clone().unwrap_or_else(|| {
                    sniffed
                        .map(|(mime, _)| mime.to_string())
                        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
                });
                Ok(PhotoPart {
                    file_name: Some(file_name),
                    mime_type: Some(mime_type),
                    length: Some(data.len() as u64),
                    body: reqwest::Body::from(data),
                })
            }
            PhotoSource::Stream { body, length } => {
                let file_name = if options.strip_filename {
                    Some(" ".to_string())
                } else {
                    options.filename.clone()
                };
                Ok(PhotoPart {
                    file_name,
                    mime_type: options.mime_type.clone(),
                    length,
                    body,
                })
            }
            PhotoSource::Path(path) => {
                let file = tokio::fs::File::open(&path).await?;
                let length = file.metadata().await?.len();
                let file_name = options.filename.clone().or_else(|| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                });
                Ok(PhotoPart {
                    file_name,
                    mime_type: options.mime_type.clone(),
                    length: Some(length),
                    body: reqwest::Body::wrap_stream(ReaderStream::new(file)),
                })
            }
        }
    }
}

impl std::fmt::Debug for PhotoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoSource::Buffer(data) => f.debug_tuple("Buffer").field(&data.len()).finish(),
            PhotoSource::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish()
            }
            PhotoSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

impl From<Bytes> for PhotoSource {
    fn from(data: Bytes) -> Self {
        PhotoSource::Buffer(data)
    }
}

impl From<Vec<u8>> for PhotoSource {
    fn from(data: Vec<u8>) -> Self {
        PhotoSource::Buffer(data.into())
    }
}

impl From<&'static [u8]> for PhotoSource {
    fn from(data: &'static [u8]) -> Self {
        PhotoSource::Buffer(Bytes::from_static(data))
    }
}

impl From<PathBuf> for PhotoSource {
    fn from(path: PathBuf) -> Self {
        PhotoSource::Path(path)
    }
}

impl From<&str> for PhotoSource {
    fn from(path: &str) -> Self {
        PhotoSource::Path(PathBuf::from(path))
    }
}

impl From<String> for PhotoSource {
    fn from(path: String) -> Self {
        PhotoSource::Path(PathBuf::from(path))
    }
}

impl From<&Path> for PhotoSource {
    fn from(path: &Path) -> Self {
        PhotoSource::Path(path.to_path_buf())
    }
}

impl From<reqwest::Response> for PhotoSource {
    fn from(response: reqwest::Response) -> Self {
        PhotoSource::from_response(response)
    }
}

/// MIME type and preferred extension from the leading magic bytes
pub fn sniff(data: &[u8]) -> Option<(&'static str, &'static str)> {
    let format = image::guess_format(data).ok()?;
    let ext = *format.extensions_str().first()?;
    Some((format.to_mime_type(), ext))
}

/// The photo part of the upload form, prior to conversion into a reqwest part
pub(crate) struct PhotoPart {
    pub(crate) file_name: Option<String>,
    pub(crate) mime_type: Option<String>,
    pub(crate) length: Option<u64>,
    body: reqwest::Body,
}

impl PhotoPart {
    pub(crate) fn into_part(self) -> Result<Part, UploadError> {
        let mut part = match self.length {
            Some(len) => Part::stream_with_length(self.body, len),
            None => Part::stream(self.body),
        };
        if let Some(name) = self.file_name {
            part = part.file_name(name);
        }
        if let Some(mime) = self.mime_type {
            part = part
                .mime_str(&mime)
                .map_err(|_| UploadError::InvalidMimeType(mime.clone()))?;
        }
        Ok(part)
    }
}
