/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid upload endpoint")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    #[error("Failed signing request: {0}")]
    Signing(String),

    #[error("Could not parse response. {0}")]
    MalformedResponse(String),

    #[error("Code: {code}, Message: {message}")]
    Api { code: u32, message: String },
}

/// Where an [`UploadError`] originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, connect, TLS)
    Transport,
    /// A response arrived but was not a recognizable upload response
    MalformedResponse,
    /// The service understood the request and rejected it
    Service,
    /// Bad input or configuration detected before anything was sent
    Local,
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Request(_) => ErrorKind::Transport,
            UploadError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            UploadError::Api { .. } => ErrorKind::Service,
            UploadError::Io(_)
            | UploadError::Deserialization(_)
            | UploadError::InvalidEndpoint(_)
            | UploadError::InvalidMimeType(_)
            | UploadError::Signing(_) => ErrorKind::Local,
        }
    }
}
