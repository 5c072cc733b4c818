/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! OAuth1 HMAC-SHA1 request signing.
//!
//! Parameters travel in the query string (and are repeated as form fields by the
//! uploader), so the same canonical form is used for both the signature base
//! string and the final URL.

use crate::upload::creds::Creds;
use crate::upload::errors::UploadError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Percent-encodes per RFC 3986, leaving only `A-Z a-z 0-9 - . _ ~` untouched
pub fn percent_encode(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

/// Builds the canonical `key=value&...` form of a parameter set.
///
/// Pairs are sorted byte-wise by key (then value) and both sides are
/// percent-encoded, so the output does not depend on insertion order.
pub fn canonical_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| {
            (
                percent_encode(k.as_ref()).into_owned(),
                percent_encode(v.as_ref()).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&enc(base url)&enc(canonical params)`, with query and fragment stripped from the url
pub fn signature_base_string<I, K, V>(method: &str, url: &Url, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&canonical_query(params))
    )
}

/// Computes the base64 HMAC-SHA1 signature. Absent secrets sign as the empty string.
pub fn sign<I, K, V>(
    method: &str,
    url: &Url,
    params: I,
    consumer_secret: Option<&str>,
    token_secret: Option<&str>,
) -> Result<String, UploadError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret.unwrap_or_default()),
        percent_encode(token_secret.unwrap_or_default())
    );
    let base = signature_base_string(method, url, params);
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| UploadError::Signing(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Random per-request nonce, 32 lowercase hex characters
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Unsigned OAuth parameters for a single request plus any extra request fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParams {
    params: BTreeMap<String, String>,
}

impl OAuthParams {
    /// Fresh parameters with a new nonce and the current timestamp
    pub fn new(creds: &Creds) -> Self {
        Self::with_nonce(creds, &new_nonce(), chrono::Utc::now().timestamp())
    }

    pub fn with_nonce(creds: &Creds, nonce: &str, timestamp: i64) -> Self {
        let mut params = BTreeMap::new();
        params.insert("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string());
        params.insert("oauth_nonce".to_string(), nonce.to_string());
        params.insert("oauth_timestamp".to_string(), timestamp.to_string());
        if let Some(key) = creds.consumer_key() {
            params.insert("oauth_consumer_key".to_string(), key.to_string());
        }
        if let Some(token) = creds.token() {
            params.insert("oauth_token".to_string(), token.to_string());
        }
        Self { params }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn canonical_query(&self) -> String {
        canonical_query(self.iter())
    }

    /// Signs the parameters, consuming them so a request is only ever signed once
    pub fn sign(mut self, method: &str, url: &Url, creds: &Creds) -> Result<SignedParams, UploadError> {
        let signature = sign(
            method,
            url,
            self.iter(),
            creds.consumer_secret(),
            creds.token_secret(),
        )?;
        self.params
            .insert("oauth_signature".to_string(), signature.clone());
        Ok(SignedParams {
            params: self.params,
            signature,
        })
    }
}

impl Extend<(String, String)> for OAuthParams {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.params.extend(iter);
    }
}

/// Parameters with `oauth_signature` included, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    params: BTreeMap<String, String>,
    signature: String,
}

impl SignedParams {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Query string including the percent-encoded signature
    pub fn query_string(&self) -> String {
        canonical_query(self.iter())
    }

    /// The endpoint with the signed query attached
    pub fn apply_to(&self, url: &Url) -> Url {
        let mut signed = url.clone();
        signed.set_query(Some(&self.query_string()));
        signed
    }
}
