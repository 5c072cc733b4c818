/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use flickr_upload::upload::{Creds, Uploader};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use wiremock::MockServer;

#[allow(dead_code)]
pub(crate) const UPLOAD_PATH: &str = "/services/upload/";

// Smallest header `image` recognizes as a JPEG
#[allow(dead_code)]
pub(crate) const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
];

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
struct FlickrOauth1Token {
    token: String,
    secret: String,
}

#[allow(dead_code)]
fn get_flickr_tokens(path: PathBuf) -> anyhow::Result<FlickrOauth1Token> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[allow(dead_code)]
pub(crate) fn get_full_auth_tokens() -> anyhow::Result<Creds> {
    let api_key = std::env::var("FLICKR_API_KEY")?;
    let api_secret = std::env::var("FLICKR_API_SECRET")?;
    let token_cache = std::env::var("FLICKR_AUTH_CACHE")?;
    let tokens = get_flickr_tokens(token_cache.into())?;

    Ok(Creds::from_tokens(
        &api_key,
        Some(&api_secret),
        Some(&tokens.token),
        Some(&tokens.secret),
    ))
}

#[allow(dead_code)]
pub(crate) fn test_creds() -> Creds {
    Creds::from_tokens("key", Some("secret"), Some("tok"), Some("toksecret"))
}

#[allow(dead_code)]
pub(crate) fn mock_uploader(server: &MockServer) -> Uploader {
    Uploader::builder(test_creds())
        .endpoint(format!("{}{}", server.uri(), UPLOAD_PATH))
        .build()
        .unwrap()
}
