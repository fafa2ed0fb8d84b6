use std::net::SocketAddr;

use configs::{AppConfig, StorageConfig};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    root: std::path::PathBuf,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

async fn start_server() -> anyhow::Result<TestServer> {
    // isolated storage per test run
    let root = std::env::temp_dir().join(format!("server_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage = StorageConfig {
        documents_dir: root.join("documents"),
        links_dir: root.join("links"),
        static_dir: root.clone(),
        ..StorageConfig::default()
    };
    cfg.normalize_and_validate()?;

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestServer { base_url, root })
}

#[tokio::test]
async fn e2e_documents_upload_download_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let form = Form::new()
        .part("files", Part::bytes(b"0123456789".to_vec()).file_name("note.txt").mime_str("text/plain")?)
        .part("files", Part::bytes(vec![7u8; 2048]).file_name("blob.bin"));
    let res = c.post(format!("{}/api/documents", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let files = body["files"].as_array().unwrap().clone();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["sizeFormatted"], "10 Bytes");
    assert_eq!(files[1]["sizeFormatted"], "2 KB");

    let list = c.get(format!("{}/api/documents", app.base_url)).send().await?.json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let path = files[0]["path"].as_str().unwrap();
    let res = c.get(format!("{}/documents/{}", app.base_url, path)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(&res.bytes().await?[..], b"0123456789");

    let id = files[0]["id"].as_str().unwrap();
    let res = c.delete(format!("{}/api/documents?id={}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(format!("{}/api/documents?id={}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let list = c.get(format!("{}/api/documents", app.base_url)).send().await?.json::<serde_json::Value>().await?;
    assert_eq!(list.as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_links_crud() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/api/links", app.base_url))
        .json(&json!({"name": "Figma", "url": "figma.com", "category": ""}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let link = res.json::<serde_json::Value>().await?["link"].clone();
    assert_eq!(link["category"], "Other");

    let res = c.put(format!("{}/api/links", app.base_url))
        .json(&json!({"id": link["id"], "name": "Figma Team", "url": "https://figma.com", "category": "Design"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let list = c.get(format!("{}/api/links", app.base_url)).send().await?.json::<serde_json::Value>().await?;
    assert_eq!(list[0]["name"], "Figma Team");
    assert_eq!(list[0]["addedDate"], link["addedDate"]);

    let res = c.delete(format!("{}/api/links?id={}", app.base_url, link["id"].as_str().unwrap())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.patch(format!("{}/api/links", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    assert!(res.headers().get("allow").is_some());
    Ok(())
}
