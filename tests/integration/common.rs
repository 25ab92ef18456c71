//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use modloader_installer::config::InstallerConfig;
use modloader_installer::workflow::Installer;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TAG: &str = "v2025.02.3.2";
pub const RELEASE_URL: &str = "https://github.com/tModLoader/tModLoader/releases/tag/v2025.02.3.2";

/// A temp directory holding a program root and an install target.
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        modloader_installer::test_utils::init_test_logging(None);
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> std::path::PathBuf {
        self.temp.path().join("installer")
    }

    pub fn target(&self) -> std::path::PathBuf {
        self.temp.path().join("game").join("tModLoader")
    }

    pub fn config(&self, server: &MockServer) -> InstallerConfig {
        InstallerConfig::new(self.root()).with_api_base(server.uri())
    }

    pub fn installer(&self, server: &MockServer) -> Installer {
        Installer::new(self.config(server)).unwrap()
    }
}

/// Serve release metadata for `tag` listing `assets`, each downloadable from
/// `/files/<name>`.
pub async fn mount_release(server: &MockServer, tag: &str, assets: &[&str]) {
    let assets: Vec<serde_json::Value> = assets
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "browser_download_url": format!("{}/files/{}", server.uri(), name),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/tModLoader/tModLoader/releases/tags/{tag}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tag_name": tag,
            "assets": assets,
        })))
        .mount(server)
        .await;
}

/// Serve `bytes` at `/files/<name>`.
pub async fn mount_archive(server: &MockServer, name: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

/// Run the binary against `root` and `api_base` with progress bars off.
///
/// Runs on the blocking pool so a mock server on the test runtime keeps
/// answering. Stdin is an empty pipe, so confirmations cannot be answered.
pub async fn run_cli(root: &Path, api_base: &str, args: &[&str]) -> Assert {
    let mut cmd = Command::cargo_bin("modloader-installer").unwrap();
    cmd.arg("--root")
        .arg(root)
        .arg("--api-base")
        .arg(api_base)
        .arg("--no-progress")
        .args(args)
        .env_remove("RUST_LOG")
        .write_stdin("");

    tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap()
}
