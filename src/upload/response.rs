/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::upload::errors::UploadError;
use crate::upload::parsers::from_trimmed_str;
use serde::Deserialize;
use std::str::FromStr;
use strum_macros::{EnumString, IntoStaticStr};

/// Value of the root `stat` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Fail,
}

/// The XML document returned by the upload endpoint.
///
/// ```xml
/// <rsp stat="ok"><photoid>12345</photoid></rsp>
/// <rsp stat="fail"><err code="1" msg="Not found"/></rsp>
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct UploadResponse {
    #[serde(default, rename = "@stat")]
    stat: Option<String>,

    // Repeated children are tolerated; the last one wins
    #[serde(default, rename = "photoid")]
    photo_ids: Vec<PhotoIdElement>,

    #[serde(default, rename = "err")]
    errors: Vec<ErrorElement>,
}

#[derive(Deserialize, Debug)]
struct PhotoIdElement {
    #[serde(default, rename = "$text", deserialize_with = "from_trimmed_str")]
    id: String,
}

#[derive(Deserialize, Debug)]
struct ErrorElement {
    #[serde(default, rename = "@code")]
    code: Option<String>,

    #[serde(default, rename = "@msg")]
    msg: Option<String>,
}

impl UploadResponse {
    /// Parses a response body. Fails only if the body is not well-formed XML.
    pub fn parse(body: &str) -> Result<Self, UploadError> {
        quick_xml::de::from_str(body).map_err(|e| UploadError::MalformedResponse(e.to_string()))
    }

    pub fn status(&self) -> Result<ResponseStatus, UploadError> {
        let stat = self
            .stat
            .as_deref()
            .ok_or_else(|| UploadError::MalformedResponse("missing stat attribute".to_string()))?;
        ResponseStatus::from_str(stat)
            .map_err(|_| UploadError::MalformedResponse(format!("unexpected stat \"{stat}\"")))
    }

    /// Text of the `photoid` element, if present and non-empty
    pub fn photo_id(&self) -> Option<&str> {
        self.photo_ids
            .last()
            .map(|p| p.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// The service error as `(code, message)`, if this is a failure response
    pub fn api_error(&self) -> Option<(u32, String)> {
        if self.status().ok()? != ResponseStatus::Fail {
            return None;
        }
        Some(match self.errors.last() {
            // A code that is not a number still marks a service failure
            Some(err) => (
                err.code
                    .as_deref()
                    .and_then(|c| c.trim().parse().ok())
                    .unwrap_or_default(),
                err.msg.clone().unwrap_or_default(),
            ),
            None => (0, "Unknown error".to_string()),
        })
    }

    /// `Code: <code>, Message: <message>` for failure responses
    pub fn error_message(&self) -> Option<String> {
        self.api_error()
            .map(|(code, message)| format!("Code: {code}, Message: {message}"))
    }

    /// Resolves to the new photo id or the error the response describes
    pub fn into_result(self) -> Result<String, UploadError> {
        match self.status()? {
            ResponseStatus::Fail => {
                let (code, message) = self.api_error().unwrap_or_default();
                Err(UploadError::Api { code, message })
            }
            ResponseStatus::Ok => self
                .photo_id()
                .map(str::to_string)
                .ok_or_else(|| UploadError::MalformedResponse("missing photoid element".to_string())),
        }
    }
}

/// Parses an upload response body into the new photo id
pub fn parse_upload_response(body: &str) -> Result<String, UploadError> {
    UploadResponse::parse(body)?.into_result()
}

/// Extracts the photo id from a response body, if there is one
pub fn photo_id_from_xml(body: &str) -> Option<String> {
    UploadResponse::parse(body)
        .ok()?
        .photo_id()
        .map(str::to_string)
}

/// Extracts the formatted service error from a response body, if there is one
pub fn error_from_xml(body: &str) -> Option<String> {
    UploadResponse::parse(body).ok()?.error_message()
}
