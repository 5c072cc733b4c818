/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{self, JPEG_BYTES, UPLOAD_PATH};
    use bytes::Bytes;
    use flickr_upload::upload::oauth;
    use flickr_upload::upload::{
        ErrorKind, PhotoSource, SafetyLevel, UploadError, UploadOptions, Uploader,
    };
    use futures::stream;
    use std::collections::HashMap;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const OK_BODY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
<photoid>12345</photoid>
</rsp>
"#;

    const FAIL_BODY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="fail">
	<err code="1" msg="Not found" />
</rsp>
"#;

    async fn mock_upload(status: u16, body: &str) -> MockServer {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPLOAD_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    async fn received(server: &MockServer) -> Vec<Request> {
        server.received_requests().await.unwrap()
    }

    fn query_map(req: &Request) -> HashMap<String, String> {
        req.url.query_pairs().into_owned().collect()
    }

    fn body_text(req: &Request) -> String {
        String::from_utf8_lossy(&req.body).into_owned()
    }

    #[tokio::test]
    async fn buffer_upload_returns_photo_id() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let options = UploadOptions {
            title: Some("Sunset & sea".to_string()),
            tags: vec!["beach".to_string(), "golden hour".to_string()],
            is_public: Some(true),
            safety_level: Some(SafetyLevel::Safe),
            ..Default::default()
        };

        let photo_id = uploader.upload(JPEG_BYTES.to_vec(), &options).await.unwrap();
        assert_eq!(photo_id, "12345");

        let requests = received(&server).await;
        assert_eq!(requests.len(), 1);
        let query = query_map(&requests[0]);
        assert_eq!(query["oauth_consumer_key"], "key");
        assert_eq!(query["oauth_token"], "tok");
        assert_eq!(query["oauth_signature_method"], "HMAC-SHA1");
        assert_eq!(query["title"], "Sunset & sea");
        assert_eq!(query["tags"], "beach \"golden hour\"");
        assert_eq!(query["is_public"], "1");
        assert_eq!(query["safety_level"], "1");

        let body = body_text(&requests[0]);
        assert!(body.contains("name=\"photo\"; filename=\"photo.jpg\""));
        assert!(body.contains("image/jpeg"));
        assert!(body.contains("name=\"oauth_signature\""));
        assert!(body.contains("name=\"title\""));
    }

    #[tokio::test]
    async fn query_signature_verifies() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap();

        let requests = received(&server).await;
        let mut query = query_map(&requests[0]);
        let signature = query.remove("oauth_signature").unwrap();

        let expected = oauth::sign(
            "POST",
            uploader.upload_url(),
            &query,
            Some("secret"),
            Some("toksecret"),
        )
        .unwrap();
        assert_eq!(signature, expected);
    }

    #[tokio::test]
    async fn service_failure_is_reported() {
        let server = mock_upload(200, FAIL_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.to_string(), "Code: 1, Message: Not found");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = mock_upload(200, "").await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::MalformedResponse(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn http_error_without_xml_is_a_parse_error() {
        let server = mock_upload(502, "<html><body>Bad Gateway</body></html>").await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        match err {
            UploadError::MalformedResponse(detail) => assert!(detail.starts_with("HTTP 502")),
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_error_with_empty_body_is_a_parse_error() {
        let server = mock_upload(500, "").await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::MalformedResponse(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn http_error_with_xml_reports_service_error() {
        let server = mock_upload(500, FAIL_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Api { code: 1, .. }));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        let uploader = Uploader::builder(helpers::test_creds())
            .endpoint("http://127.0.0.1:1/services/upload/")
            .build()
            .unwrap();
        let err = uploader
            .upload(JPEG_BYTES.to_vec(), &UploadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Request(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn stream_upload_can_strip_filename() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let chunks = stream::iter(vec![
            Ok::<_, std::io::Error>(Bytes::from_static(&JPEG_BYTES[..4])),
            Ok(Bytes::from_static(&JPEG_BYTES[4..])),
        ]);
        let options = UploadOptions {
            strip_filename: true,
            ..Default::default()
        };

        let photo_id = uploader
            .upload(PhotoSource::from_stream(chunks, None), &options)
            .await
            .unwrap();
        assert_eq!(photo_id, "12345");

        let requests = received(&server).await;
        let body = body_text(&requests[0]);
        assert!(body.contains("name=\"photo\"; filename=\" \""));
    }

    #[tokio::test]
    async fn response_body_is_reuploaded_as_stream() {
        let server = mock_upload(200, OK_BODY).await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
            .mount(&server)
            .await;
        let uploader = helpers::mock_uploader(&server);

        let download = reqwest::get(format!("{}/img.jpg", server.uri())).await.unwrap();
        let source = PhotoSource::from_response(download);
        assert_eq!(source.kind(), "stream");
        let options = UploadOptions {
            strip_filename: true,
            ..Default::default()
        };
        assert_eq!(uploader.upload(source, &options).await.unwrap(), "12345");

        let download = reqwest::get(format!("{}/img.jpg", server.uri())).await.unwrap();
        assert_eq!(
            uploader.upload(download, &UploadOptions::default()).await.unwrap(),
            "12345"
        );

        let uploads: Vec<Request> = received(&server)
            .await
            .into_iter()
            .filter(|req| req.method.as_str() == "POST")
            .collect();
        assert_eq!(uploads.len(), 2);
        for upload in &uploads {
            let body = body_text(upload);
            assert!(body.contains("name=\"photo\""));
            assert!(body.contains("JFIF"));
        }
        assert!(body_text(&uploads[0]).contains("filename=\" \""));
    }

    #[tokio::test]
    async fn path_upload_sends_file_name() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);

        let dir = tempfile::tempdir().unwrap();
        let photo_path = dir.path().join("beach.jpg");
        std::fs::File::create(&photo_path)
            .unwrap()
            .write_all(JPEG_BYTES)
            .unwrap();

        let photo_id = uploader
            .upload(photo_path.as_path(), &UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(photo_id, "12345");

        let requests = received(&server).await;
        let body = body_text(&requests[0]);
        assert!(body.contains("filename=\"beach.jpg\""));
    }

    #[tokio::test]
    async fn missing_file_fails_before_sending() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let err = uploader
            .upload("/no/such/photo.jpg", &UploadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Io(_)));
        assert!(received(&server).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_uploads_sign_independently() {
        let server = mock_upload(200, OK_BODY).await;
        let uploader = helpers::mock_uploader(&server);
        let other = uploader.clone();
        let options = UploadOptions::default();

        let (a, b) = tokio::join!(
            uploader.upload(JPEG_BYTES.to_vec(), &options),
            other.upload(JPEG_BYTES.to_vec(), &options),
        );
        assert_eq!(a.unwrap(), "12345");
        assert_eq!(b.unwrap(), "12345");

        let requests = received(&server).await;
        assert_eq!(requests.len(), 2);
        let first = query_map(&requests[0]);
        let second = query_map(&requests[1]);
        assert_ne!(first["oauth_nonce"], second["oauth_nonce"]);
        assert_ne!(first["oauth_signature"], second["oauth_signature"]);
    }
}
