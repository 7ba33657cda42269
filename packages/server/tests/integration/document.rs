use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::common::{MAX_DOCUMENT_SIZE, TestApp, admin_token, judge_token, routes};

#[tokio::test]
async fn uploaded_document_downloads_byte_for_byte() {
    let app = TestApp::spawn().await;
    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "base64": STANDARD.encode(&content),
                "mime_type": "application/pdf",
                "filename": "rubric.pdf",
            }),
            &admin_token(),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["status"], "success");
    assert_eq!(res.body["filename"], "rubric.pdf");
    let file_url = res.body["file_url"].as_str().unwrap();
    assert!(file_url.starts_with(&app.url("/api/v1/documents/")));

    // No token needed to view a shared link.
    let (status, headers, bytes) = app.get_bytes(file_url).await;
    assert_eq!(status, 200);
    assert_eq!(headers["content-type"], "application/pdf");
    assert!(
        headers["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("inline; filename=\"rubric.pdf\"")
    );
    assert_eq!(bytes, content);
}

#[tokio::test]
async fn data_url_prefix_is_accepted_and_type_guessed() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "base64": format!("data:text/plain;base64,{}", STANDARD.encode("hello judges")),
                "mime_type": "",
                "filename": "notes.txt",
            }),
            &admin_token(),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let (_, headers, bytes) = app.get_bytes(res.body["file_url"].as_str().unwrap()).await;
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/plain"));
    assert_eq!(bytes, b"hello judges");
}

#[tokio::test]
async fn invalid_base64_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({"base64": "%%%", "mime_type": "text/plain", "filename": "x.txt"}),
            &admin_token(),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn path_like_filename_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "base64": STANDARD.encode("data"),
                "mime_type": "text/plain",
                "filename": "../../etc/passwd",
            }),
            &admin_token(),
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn oversized_document_is_rejected() {
    let app = TestApp::spawn().await;
    let content = vec![7u8; MAX_DOCUMENT_SIZE as usize + 1];

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({
                "base64": STANDARD.encode(&content),
                "mime_type": "application/octet-stream",
                "filename": "big.bin",
            }),
            &admin_token(),
        )
        .await;

    assert_eq!(res.status, 413);
    assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn judges_cannot_upload() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::DOCUMENTS,
            &json!({"base64": STANDARD.encode("x"), "mime_type": "text/plain", "filename": "x.txt"}),
            &judge_token("jordan"),
        )
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let app = TestApp::spawn().await;

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let res = app
            .get_without_token(&format!("{}/{id}", routes::DOCUMENTS))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
