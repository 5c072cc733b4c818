/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr Upload
//!
//! A small client for the Flickr upload API: it signs a multipart `POST` with
//! OAuth1 (HMAC-SHA1) and turns the XML reply into the new photo id.
//!
//! For further details on the upload API refer to the
//! [Flickr Upload Docs](https://www.flickr.com/services/api/upload.api.html)
//!
//! ## Features
//!
//! - OAuth1 HMAC-SHA1 signing with parameters carried in the query string
//! - Upload from an in-memory buffer, any byte stream (including another
//!   HTTP response) or a file path
//! - Image type sniffing for buffers
//! - Photo metadata: title, description, tags, visibility, safety level,
//!   content type, search visibility
//! - Service failures, malformed replies and network errors are separate
//!   [`upload::UploadError`] variants
//!
//! *Getting the Access Token/Secret is left up to the consumer of this library.
//! Both the `api_key`/`api_secret`/`access_token`/`access_token_secret` layout
//! and the `consumer_key`/`consumer_secret`/`token`/`token_secret` layout are
//! accepted by [`upload::Creds::from_json`].*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr-upload = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flickr_upload::upload::{Creds, SafetyLevel, UploadOptions, Uploader};
//!
//!async fn upload_all(creds_json: &str, photos: Vec<Vec<u8>>) -> anyhow::Result<Vec<String>> {
//!    let uploader = Uploader::new(Creds::from_json(creds_json)?);
//!
//!    let options = UploadOptions {
//!        tags: vec!["holiday".to_string(), "new york".to_string()],
//!        is_public: Some(false),
//!        is_family: Some(true),
//!        safety_level: Some(SafetyLevel::Safe),
//!        ..Default::default()
//!    };
//!
//!    let mut ids = Vec::new();
//!    for photo in photos {
//!        // Buffers are sniffed, so a JPEG goes up as photo.jpg / image/jpeg
//!        ids.push(uploader.upload(photo, &options).await?);
//!    }
//!    Ok(ids)
//!}
//! ```
//!
pub mod upload;
