//! Single-file integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_folder, http_client, test_auth, test_folder, upload, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_download_and_delete_file() {
        let client = http_client();
        let folder = test_folder("file");
        let filename = format!("{folder}hello.txt");

        upload(&client, &filename, b"hello world").await;

        let resp = client
            .get(url("/get"))
            .query(&[("filename", filename.as_str())])
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/octet-stream")
        );
        assert_eq!(resp.bytes().await.unwrap().as_ref(), b"hello world");

        let resp = client
            .delete(url("/delete"))
            .query(&[("filename", filename.as_str())])
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("delete");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), format!("File \"{filename}\" deleted"));

        cleanup_folder(&client, &folder).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_missing_file() {
        let client = http_client();
        let resp = client
            .get(url("/get"))
            .query(&[("filename", "definitely-missing.txt")])
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.unwrap(), r#"{"error": "File not found"}"#);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_filename_for_upload() {
        let client = http_client();
        let resp = client
            .put(url("/put"))
            .header("Authorization", test_auth())
            .body("aGk=")
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), 400);
        assert_eq!(
            resp.text().await.unwrap(),
            r#"{"error": "Missing filename"}"#
        );
    }
}
