/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::upload::errors::UploadError;
use crate::upload::parsers::from_empty_str_to_none;
use serde::Deserialize;

/// OAuth1 consumer and access token credentials.
///
/// Every field is optional. A missing key or token is left out of the signed
/// parameters and a missing secret signs as the empty string.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Creds {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    token: Option<String>,
    token_secret: Option<String>,
}

impl Creds {
    /// Creates credentials from the consumer key and the optional secret/token pair
    pub fn from_tokens(
        consumer_key: &str,
        consumer_secret: Option<&str>,
        token: Option<&str>,
        token_secret: Option<&str>,
    ) -> Self {
        Self {
            consumer_key: non_empty(Some(consumer_key)),
            consumer_secret: non_empty(consumer_secret),
            token: non_empty(token),
            token_secret: non_empty(token_secret),
        }
    }

    /// Parses a JSON credentials document in either the
    /// `api_key`/`api_secret`/`access_token`/`access_token_secret` layout or the
    /// `consumer_key`/`consumer_secret`/`token`/`token_secret` layout.
    pub fn from_json(json: &str) -> Result<Self, UploadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn consumer_key(&self) -> Option<&str> {
        self.consumer_key.as_deref()
    }

    pub fn consumer_secret(&self) -> Option<&str> {
        self.consumer_secret.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.filter(|s| !s.is_empty()).map(str::to_string)
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "xxx");
        f.debug_struct("Creds")
            .field("consumer_key", &mask(&self.consumer_key))
            .field("consumer_secret", &mask(&self.consumer_secret))
            .field("token", &mask(&self.token))
            .field("token_secret", &mask(&self.token_secret))
            .finish()
    }
}

// Both layouts are accepted; the consumer/token names win when a field shows up twice
#[derive(Deserialize, Default)]
struct CredsDocument {
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    api_key: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    api_secret: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    access_token: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    access_token_secret: Option<String>,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    consumer_key: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    consumer_secret: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    token: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    token_secret: Option<String>,
}

impl From<CredsDocument> for Creds {
    fn from(doc: CredsDocument) -> Self {
        Self {
            consumer_key: doc.consumer_key.or(doc.api_key),
            consumer_secret: doc.consumer_secret.or(doc.api_secret),
            token: doc.token.or(doc.access_token),
            token_secret: doc.token_secret.or(doc.access_token_secret),
        }
    }
}

impl<'de> Deserialize<'de> for Creds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        CredsDocument::deserialize(deserializer).map(Creds::from)
    }
}
