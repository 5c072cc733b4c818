/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;

/// Content filter level of the uploaded photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoPrimitive, TryFromPrimitive)]
#[serde(try_from = "u8")]
#[repr(u8)]
pub enum SafetyLevel {
    Safe = 1,
    Moderate = 2,
    Restricted = 3,
}

/// Kind of content being uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoPrimitive, TryFromPrimitive)]
#[serde(try_from = "u8")]
#[repr(u8)]
pub enum ContentType {
    Photo = 1,
    Screenshot = 2,
    Other = 3,
}

/// Whether the photo shows up in global search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoPrimitive, TryFromPrimitive)]
#[serde(try_from = "u8")]
#[repr(u8)]
pub enum Hidden {
    Visible = 1,
    Hidden = 2,
}

/// Optional metadata and multipart settings for an upload.
///
/// Metadata fields are sent as signed request parameters. `filename`,
/// `mime_type` and `strip_filename` only affect the `photo` part of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadOptions {
    pub title: Option<String>,

    pub description: Option<String>,

    pub tags: Vec<String>,

    pub is_public: Option<bool>,

    pub is_friend: Option<bool>,

    pub is_family: Option<bool>,

    pub safety_level: Option<SafetyLevel>,

    pub content_type: Option<ContentType>,

    pub hidden: Option<Hidden>,

    /// Overrides the filename of the photo part
    pub filename: Option<String>,

    /// Overrides the MIME type of the photo part
    #[serde(alias = "contentType")]
    pub mime_type: Option<String>,

    /// Sends a single space as the filename of streamed photos
    #[serde(alias = "stripFilename")]
    pub strip_filename: bool,
}

impl UploadOptions {
    /// The metadata fields that are set, stringified the way the upload API expects
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));

        if let Some(title) = &self.title {
            push("title", title.clone());
        }
        if let Some(description) = &self.description {
            push("description", description.clone());
        }
        if !self.tags.is_empty() {
            push("tags", join_tags(&self.tags));
        }
        if let Some(v) = self.is_public {
            push("is_public", flag(v));
        }
        if let Some(v) = self.is_friend {
            push("is_friend", flag(v));
        }
        if let Some(v) = self.is_family {
            push("is_family", flag(v));
        }
        if let Some(v) = self.safety_level {
            push("safety_level", u8::from(v).to_string());
        }
        if let Some(v) = self.content_type {
            push("content_type", u8::from(v).to_string());
        }
        if let Some(v) = self.hidden {
            push("hidden", u8::from(v).to_string());
        }
        params
    }
}

fn flag(v: bool) -> String {
    if v { "1" } else { "0" }.to_string()
}

// Space separated; multi-word tags are quoted
fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.contains(char::is_whitespace) {
                format!("\"{}\"", t.replace('"', ""))
            } else {
                t.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
