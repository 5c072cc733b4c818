/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::upload::api::{ApiClient, UPLOAD_URL};
use crate::upload::creds::Creds;
use crate::upload::errors::UploadError;
use crate::upload::options::UploadOptions;
use crate::upload::response::parse_upload_response;
use crate::upload::source::PhotoSource;
use log::{debug, warn};
use std::sync::Arc;
use url::Url;

/// Uploads photos with a fixed set of credentials.
///
/// Cloning is cheap and clones share the same connection pool, so one
/// `Uploader` can drive any number of concurrent uploads.
///
/// ```no_run
/// use flickr_upload::upload::{Creds, UploadOptions, Uploader};
///
/// async fn upload_sunset() -> Result<String, flickr_upload::upload::UploadError> {
///     let uploader = Uploader::new(Creds::from_tokens(
///         "api key",
///         Some("api secret"),
///         Some("access token"),
///         Some("access token secret"),
///     ));
///     let options = UploadOptions {
///         title: Some("Sunset".to_string()),
///         is_public: Some(true),
///         ..Default::default()
///     };
///     uploader.upload("sunset.jpg", &options).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Uploader {
    api_client: Arc<ApiClient>,
}

impl Uploader {
    /// Creates an uploader for the default upload endpoint
    pub fn new(creds: Creds) -> Self {
        Self {
            api_client: Arc::new(ApiClient::new(
                creds,
                reqwest::Client::new(),
                default_upload_url(),
            )),
        }
    }

    pub fn builder(creds: Creds) -> UploaderBuilder {
        UploaderBuilder::new(creds)
    }

    pub fn creds(&self) -> &Creds {
        self.api_client.creds()
    }

    pub fn upload_url(&self) -> &Url {
        self.api_client.upload_url()
    }

    /// Uploads a photo and returns the id the service assigned to it
    pub async fn upload(
        &self,
        photo: impl Into<PhotoSource>,
        options: &UploadOptions,
    ) -> Result<String, UploadError> {
        let photo = photo.into();
        let kind = photo.kind();

        // The photo part has to be complete before the form is assembled
        let photo_part = photo.into_photo_part(options).await?;
        let params = self.api_client.sign(options.to_params())?;

        debug!("Uploading {} photo source", kind);
        let (status, body) = self.api_client.post_multipart(&params, photo_part).await?;

        match parse_upload_response(&body) {
            Ok(photo_id) => {
                debug!("Upload created photo {}", photo_id);
                Ok(photo_id)
            }
            Err(UploadError::MalformedResponse(detail)) => {
                warn!("Could not parse upload response (HTTP {}): {}", status, detail);
                if status.is_success() {
                    Err(UploadError::MalformedResponse(detail))
                } else {
                    Err(UploadError::MalformedResponse(format!("HTTP {status}: {detail}")))
                }
            }
            Err(err) => Err(err),
        }
    }
}

fn default_upload_url() -> Url {
    Url::parse(UPLOAD_URL).expect("UPLOAD_URL is a valid url")
}

/// Configures an [`Uploader`] beyond the defaults
#[derive(Debug)]
pub struct UploaderBuilder {
    creds: Creds,
    endpoint: Option<String>,
    https_client: Option<reqwest::Client>,
    user_agent: Option<String>,
}

impl UploaderBuilder {
    pub fn new(creds: Creds) -> Self {
        Self {
            creds,
            endpoint: None,
            https_client: None,
            user_agent: None,
        }
    }

    /// Posts to `endpoint` instead of the Flickr upload url
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Uses an already configured HTTP client (timeouts, proxies, ...)
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.https_client = Some(client);
        self
    }

    /// Ignored when a client is supplied through [`UploaderBuilder::http_client`]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<Uploader, UploadError> {
        let upload_url = match self.endpoint {
            Some(endpoint) => Url::parse(&endpoint)?,
            None => default_upload_url(),
        };
        let https_client = match (self.https_client, self.user_agent) {
            (Some(client), _) => client,
            (None, Some(ua)) => reqwest::Client::builder().user_agent(ua).build()?,
            (None, None) => reqwest::Client::new(),
        };
        Ok(Uploader {
            api_client: Arc::new(ApiClient::new(self.creds, https_client, upload_url)),
        })
    }
}
