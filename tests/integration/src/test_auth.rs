//! Authentication, preflight and health integration tests.

#[cfg(test)]
mod tests {
    use crate::{basic_auth, http_client, test_auth, test_user, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let client = http_client();
        let resp = client.get(url("/_health")).send().await.expect("health");
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.expect("health body");
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_and_wrong_credentials() {
        let client = http_client();

        let resp = client.get(url("/list")).send().await.expect("list");
        assert_eq!(resp.status(), 401);
        assert_eq!(resp.text().await.unwrap(), r#"{"error": "Unauthorized"}"#);

        let resp = client
            .get(url("/list"))
            .header("Authorization", basic_auth(&test_user(), "wrong"))
            .send()
            .await
            .expect("list");
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_preflight_with_cors_headers() {
        let client = http_client();
        let resp = client
            .request(reqwest::Method::OPTIONS, url("/put"))
            .send()
            .await
            .expect("preflight");
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unsupported_operation() {
        let client = http_client();
        let resp = client
            .post(url("/put"))
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("post");
        assert_eq!(resp.status(), 405);
        assert_eq!(
            resp.text().await.unwrap(),
            r#"{"error": "Unsupported operation"}"#
        );
    }
}
