//! Integration tests for the upload API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app};

    const BOUNDARY: &str = "test-boundary";

    fn multipart_request(file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\ncontent-type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .uri("/api/upload")
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn it_stores_an_image_and_returns_a_file_path() {
        let app = test_app("http://127.0.0.1:1");

        let response = app
            .oneshot(multipart_request("problem.png", b"png-bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let path = json["path"].as_str().unwrap();
        assert!(path.starts_with("file://"));
        assert!(path.ends_with(".png"));

        // The file outlives the request so the next submission can
        // reference it
        let on_disk = path.trim_start_matches("file://");
        let stored = std::fs::read(on_disk).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn it_normalizes_extension_case() {
        let app = test_app("http://127.0.0.1:1");

        let response = app
            .oneshot(multipart_request("problem.JPG", b"jpg-bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains(".jpg"));
    }

    #[tokio::test]
    async fn it_rejects_unsupported_file_types() {
        let app = test_app("http://127.0.0.1:1");

        let response = app
            .oneshot(multipart_request("problem.gif", b"gif-bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("problem.gif"));
    }

    #[tokio::test]
    async fn it_rejects_uploads_without_a_file() {
        let app = test_app("http://127.0.0.1:1");

        let mut body = Vec::new();
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n")
                .as_bytes(),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/upload")
                    .method("POST")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
