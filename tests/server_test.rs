//! End-to-end tests for the HTTP front door against a mocked Yandex.Disk.

use mockito::{Matcher, Mock, Server, ServerGuard};
use reqwest::redirect::Policy;
use reqwest::{header, Client, StatusCode};
use serde_json::json;
use tokio::net::TcpListener;
use yadisk_share::{router, AppState, DiskClient, DownloadMode, UpstreamConfig};

const LIST_PATH: &str = "/v1/disk/public/resources";
const LINK_PATH: &str = "/v1/disk/public/resources/download";

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_app(upstream: &ServerGuard, mode: DownloadMode) -> String {
    let client = DiskClient::new(UpstreamConfig::with_base_url(&upstream.url())).unwrap();
    let app = router(AppState::new(client, mode));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn browser() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

async fn untouched(server: &mut ServerGuard, path: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await
}

async fn mock_link(server: &mut ServerGuard, path: &str, href: &str) -> Mock {
    server
        .mock("GET", LINK_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("public_key".into(), "abc123".into()),
            Matcher::UrlEncoded("path".into(), path.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"href": href, "method": "GET"}).to_string())
        .create_async()
        .await
}

mod index {
    use super::*;

    #[tokio::test]
    async fn renders_entry_form() {
        let upstream = Server::new_async().await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser().get(format!("{}/", base)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.text().await.unwrap();
        assert!(body.contains("action=\"/files/\""));
        assert!(body.contains("name=\"public_key\""));
        assert!(body.contains("name=\"file_type\""));
    }
}

mod files {
    use super::*;

    #[tokio::test]
    async fn missing_key_redirects_to_form() {
        let mut upstream = Server::new_async().await;
        let listing = untouched(&mut upstream, LIST_PATH).await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        for url in [format!("{}/files/", base), format!("{}/files/?public_key=", base)] {
            let response = browser().get(url).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "/");
        }
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn share_link_is_listed_and_filtered() {
        let mut upstream = Server::new_async().await;
        let listing = upstream
            .mock("GET", LIST_PATH)
            .match_query(Matcher::UrlEncoded("public_key".into(), "abc123".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"_embedded": {"items": [
                    {"name": "a.png", "path": "/a.png", "type": "file", "mime_type": "image/png", "size": 10},
                    {"name": "b.txt", "path": "/b.txt", "type": "file", "mime_type": "text/plain", "size": 20}
                ]}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .get(format!("{}/files/", base))
            .query(&[
                ("public_key", "https://disk.yandex.ru/d/abc123"),
                ("file_type", "image"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.text().await.unwrap();
        assert!(body.contains(">a.png</a>"));
        assert!(!body.contains("b.txt"));
        assert!(body.contains("action=\"/download_multiple/\""));
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_failure_becomes_error_body() {
        let mut upstream = Server::new_async().await;
        let _listing = upstream
            .mock("GET", LIST_PATH)
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(
                json!({"error": "DiskNotFoundError", "description": "Resource not found."})
                    .to_string(),
            )
            .create_async()
            .await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .get(format!("{}/files/?public_key=abc123", base))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.text().await.unwrap();
        assert!(body.contains("HTTP error occurred"));
        assert!(body.contains("DiskNotFoundError"));
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn missing_params_are_not_found_without_upstream_call() {
        let mut upstream = Server::new_async().await;
        let links = untouched(&mut upstream, LINK_PATH).await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let queries = [
            "file_path=%2Fa.txt&file_name=a.txt",
            "public_key=abc123&file_name=a.txt",
            "public_key=abc123&file_path=%2Fa.txt",
            "public_key=abc123&file_path=&file_name=a.txt",
        ];
        for query in queries {
            let response = browser()
                .get(format!("{}/download/?{}", base, query))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "query: {query}");
        }
        links.assert_async().await;
    }

    #[tokio::test]
    async fn link_mode_renders_anchor() {
        let mut upstream = Server::new_async().await;
        let _link = mock_link(
            &mut upstream,
            "/docs/report.pdf",
            "https://downloader.disk.yandex.ru/disk/xyz?a=1&b=2",
        )
        .await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .get(format!("{}/download/", base))
            .query(&[
                ("public_key", "abc123"),
                ("file_path", "/docs/report.pdf"),
                ("file_name", "report.pdf"),
                ("mode", "link"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.text().await.unwrap();
        assert!(body.contains("href=\"https://downloader.disk.yandex.ru/disk/xyz?a=1&amp;b=2\""));
        assert!(body.contains(">report.pdf</a>"));
    }

    #[tokio::test]
    async fn stream_mode_proxies_file_bytes() {
        let mut upstream = Server::new_async().await;
        let href = format!("{}/blob/photo.png", upstream.url());
        let _link = mock_link(&mut upstream, "/photo.png", &href).await;
        let file = upstream
            .mock("GET", "/blob/photo.png")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(b"\x89PNG-bytes".to_vec())
            .expect(1)
            .create_async()
            .await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .get(format!("{}/download/", base))
            .query(&[
                ("public_key", "https://disk.yandex.ru/d/abc123"),
                ("file_path", "/photo.png"),
                ("file_name", "photo.png"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"photo.png\""));
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"\x89PNG-bytes");
        file.assert_async().await;
    }

    #[tokio::test]
    async fn unresolved_link_is_not_found() {
        let mut upstream = Server::new_async().await;
        let _link = upstream
            .mock("GET", LINK_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"method": "GET"}).to_string())
            .create_async()
            .await;
        let base = spawn_app(&upstream, DownloadMode::Link).await;

        let response = browser()
            .get(format!(
                "{}/download/?public_key=abc123&file_path=%2Fa.txt&file_name=a.txt",
                base
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.text().await.unwrap().contains("/a.txt"));
    }
}

mod download_multiple {
    use super::*;

    #[tokio::test]
    async fn renders_anchor_per_file_in_order() {
        let mut upstream = Server::new_async().await;
        let _b = mock_link(&mut upstream, "/b.txt", "https://dl.example/b").await;
        let _a = mock_link(&mut upstream, "/dir/a.png", "https://dl.example/a").await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .post(format!("{}/download_multiple/", base))
            .form(&[
                ("public_key", "https://disk.yandex.ru/d/abc123"),
                ("file_ids", "/b.txt"),
                ("file_ids", "/dir/a.png"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.text().await.unwrap();
        let b = body.find("https://dl.example/b").unwrap();
        let a = body.find("https://dl.example/a").unwrap();
        assert!(b < a);
        assert!(body.contains(">a.png</a>"));
        assert_eq!(body.matches("<a ").count(), 2);
    }

    #[tokio::test]
    async fn missing_params_are_not_found() {
        let mut upstream = Server::new_async().await;
        let links = untouched(&mut upstream, LINK_PATH).await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let forms: [&[(&str, &str)]; 2] = [&[("public_key", "abc123")], &[("file_ids", "/a.txt")]];
        for form in forms {
            let response = browser()
                .post(format!("{}/download_multiple/", base))
                .form(form)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        links.assert_async().await;
    }

    #[tokio::test]
    async fn first_failure_aborts_batch() {
        let mut upstream = Server::new_async().await;
        let _ok = mock_link(&mut upstream, "/a.txt", "https://dl.example/a").await;
        let _denied = upstream
            .mock("GET", LINK_PATH)
            .match_query(Matcher::UrlEncoded("path".into(), "/b.txt".into()))
            .with_status(403)
            .with_body(json!({"error": "DiskForbiddenError"}).to_string())
            .create_async()
            .await;
        let later = upstream
            .mock("GET", LINK_PATH)
            .match_query(Matcher::UrlEncoded("path".into(), "/c.txt".into()))
            .expect(0)
            .create_async()
            .await;
        let base = spawn_app(&upstream, DownloadMode::Stream).await;

        let response = browser()
            .post(format!("{}/download_multiple/", base))
            .form(&[
                ("public_key", "abc123"),
                ("file_ids", "/a.txt"),
                ("file_ids", "/b.txt"),
                ("file_ids", "/c.txt"),
            ])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.text().await.unwrap().contains("DiskForbiddenError"));
        later.assert_async().await;
    }
}
