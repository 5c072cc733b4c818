/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::upload::creds::Creds;
use crate::upload::errors::UploadError;
use crate::upload::oauth::{OAuthParams, SignedParams};
use crate::upload::source::{PHOTO_FIELD, PhotoPart};
use log::{debug, trace};
use reqwest::StatusCode;
use reqwest::multipart::Form;
use url::Url;

// Flickr upload endpoint
pub const UPLOAD_URL: &str = "https://up.flickr.com/services/upload/";

/// Directly communicates with the upload endpoint.
#[derive(Clone)]
pub struct ApiClient {
    creds: Creds,
    https_client: reqwest::Client,
    upload_url: Url,
}

impl ApiClient {
    pub fn new(creds: Creds, https_client: reqwest::Client, upload_url: Url) -> Self {
        Self {
            creds,
            https_client,
            upload_url,
        }
    }

    pub fn creds(&self) -> &Creds {
        &self.creds
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    /// Builds and signs the parameters for one POST. Every call gets its own nonce and timestamp.
    pub fn sign(&self, fields: Vec<(String, String)>) -> Result<SignedParams, UploadError> {
        let mut params = OAuthParams::new(&self.creds);
        params.extend(fields);
        params.sign("POST", &self.upload_url, &self.creds)
    }

    /// Posts the multipart form and returns the HTTP status and body text
    pub(crate) async fn post_multipart(
        &self,
        params: &SignedParams,
        photo: PhotoPart,
    ) -> Result<(StatusCode, String), UploadError> {
        let mut form = Form::new().part(PHOTO_FIELD, photo.into_part()?);
        for (key, value) in params.iter() {
            form = form.text(key.to_string(), value.to_string());
        }

        let req_url = params.apply_to(&self.upload_url);
        debug!(
            "POST {} with {} signed fields",
            self.upload_url,
            params.len()
        );
        let resp = self
            .https_client
            .post(req_url)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!("Upload response status {}", status);
        trace!("Upload response body: {}", body);
        Ok((status, body))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("creds", &self.creds)
            .field("upload_url", &self.upload_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            Creds::from_tokens("key", Some("secret"), Some("tok"), Some("toksecret")),
            reqwest::Client::new(),
            Url::parse(UPLOAD_URL).unwrap(),
        )
    }

    #[test]
    fn each_signing_uses_a_fresh_nonce() {
        let client = client();
        let a = client.sign(vec![("title".to_string(), "t".to_string())]).unwrap();
        let b = client.sign(vec![("title".to_string(), "t".to_string())]).unwrap();
        assert_ne!(a.get("oauth_nonce"), b.get("oauth_nonce"));
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.get("oauth_consumer_key"), Some("key"));
        assert_eq!(a.get("oauth_token"), Some("tok"));
        assert_eq!(a.get("title"), Some("t"));
    }

    #[test]
    fn debug_hides_secrets() {
        let out = format!("{:?}", client());
        assert!(!out.contains("toksecret"));
        assert!(out.contains("up.flickr.com"));
    }
}
