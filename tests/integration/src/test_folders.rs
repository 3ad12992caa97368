//! Folder listing, download and delete integration tests.

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use crate::{cleanup_folder, http_client, test_auth, test_folder, upload, url};

    async fn list(client: &reqwest::Client, path: &str, prefix: Option<&str>) -> Vec<String> {
        let mut req = client.get(url(path)).header("Authorization", test_auth());
        if let Some(prefix) = prefix {
            req = req.query(&[("prefix", prefix)]);
        }
        let resp = req.send().await.expect("list");
        assert_eq!(resp.status(), 200);
        resp.json().await.expect("list body")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_folders_and_files() {
        let client = http_client();
        let folder = test_folder("list");

        upload(&client, &folder, b" ").await;
        upload(&client, &format!("{folder}a.txt"), b"a").await;
        upload(&client, &format!("{folder}sub/b.txt"), b"b").await;

        let folders = list(&client, "/list", None).await;
        assert!(folders.contains(&folder), "{folders:?}");

        let files = list(&client, "/list-files", Some(&folder)).await;
        assert_eq!(files, vec!["a.txt".to_owned()]);

        cleanup_folder(&client, &folder).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_download_folder_as_zip() {
        let client = http_client();
        let folder = test_folder("zip");
        upload(&client, &format!("{folder}one.txt"), b"1").await;
        upload(&client, &format!("{folder}two.txt"), b"22").await;

        let resp = client
            .get(url("/download-folder"))
            .query(&[("prefix", folder.as_str())])
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("download-folder");
        assert_eq!(resp.status(), 200);
        let bytes = resp.bytes().await.unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("zip");
        assert_eq!(archive.len(), 2);
        let mut entry = archive
            .by_name(&format!("{folder}two.txt"))
            .expect("two.txt entry");
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "22");

        cleanup_folder(&client, &folder).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_folder_recursively() {
        let client = http_client();
        let folder = test_folder("rm");
        upload(&client, &format!("{folder}x.txt"), b"x").await;
        upload(&client, &format!("{folder}deep/y.txt"), b"y").await;

        let resp = client
            .delete(url("/delete-folder"))
            .query(&[("prefix", folder.as_str())])
            .header("Authorization", test_auth())
            .send()
            .await
            .expect("delete-folder");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), format!("Folder \"{folder}\" deleted"));

        let files = list(&client, "/list-files", Some(&folder)).await;
        assert!(files.is_empty(), "{files:?}");
    }
}
