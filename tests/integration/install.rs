use crate::common::{RELEASE_URL, TAG, TestEnv, mount_archive, mount_release};
use modloader_installer::core::InstallerError;
use modloader_installer::test_utils::{ArchiveEntry, read_tree, write_tree, zip_bytes, zip_files};
use modloader_installer::workflow::{NoProgress, Stage, WorkflowEvent};
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_install_end_to_end() {
    let env = TestEnv::new();
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["ExampleMod.zip", "tModLoader.zip"]).await;
    mount_archive(
        &server,
        "tModLoader.zip",
        zip_bytes(&[
            ArchiveEntry::file("tModLoader.dll", "new build"),
            ArchiveEntry::dir("Libraries/"),
            ArchiveEntry::file("Libraries/Native/steam_api.so", "native"),
        ]),
    )
    .await;

    let target = env.target();
    write_tree(&target, &[("old.txt", "from the previous install"), ("tModLoader.dll", "old build")]);

    let mut handle = env.installer(&server).spawn_install(RELEASE_URL, target.clone());
    let mut stages = Vec::new();
    while let Some(event) = handle.events.recv().await {
        if let WorkflowEvent::Stage(stage) = event {
            stages.push(stage);
        }
    }
    let outcome = handle.task.await.unwrap().unwrap();

    assert_eq!(outcome.tag, TAG);
    assert!(outcome.asset.url.ends_with("/files/tModLoader.zip"));
    assert_eq!(stages.last(), Some(&Stage::Complete));

    let backup = outcome.backup.expect("existing install is backed up");
    let backed_up = read_tree(&backup.path);
    assert_eq!(backed_up["old.txt"], b"from the previous install");
    assert_eq!(backed_up["tModLoader.dll"], b"old build");
    assert!(!backed_up.contains_key("Libraries/"));

    let installed = read_tree(&target);
    assert_eq!(installed["old.txt"], b"from the previous install");
    assert_eq!(installed["tModLoader.dll"], b"new build");
    assert_eq!(installed["Libraries/Native/steam_api.so"], b"native");

    assert!(!env.root().join("downloads/tModLoader_temp.zip").exists());
    assert!(!target.join("backups").exists());
}

#[tokio::test]
async fn test_install_missing_asset_changes_nothing() {
    let env = TestEnv::new();
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["ExampleMod.zip"]).await;

    let target = env.target();
    write_tree(&target, &[("old.txt", "old")]);
    let before = read_tree(&target);

    let installer = env.installer(&server);
    let err = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap_err();

    assert!(matches!(err, InstallerError::AssetNotFound { .. }));
    assert!(!err.is_retryable());
    assert_eq!(read_tree(&target), before);
    assert!(installer.backups().list_backups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_install_download_failure_keeps_target() {
    let env = TestEnv::new();
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["tModLoader.zip"]).await;

    let target = env.target();
    write_tree(&target, &[("old.txt", "old")]);
    let before = read_tree(&target);

    let installer = env.installer(&server);
    let err = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap_err();

    assert!(matches!(err, InstallerError::NetworkError { status: Some(404), .. }));
    assert!(err.is_retryable());
    assert_eq!(read_tree(&target), before);
    assert_eq!(installer.backups().list_backups().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reinstall_creates_second_backup() {
    let env = TestEnv::new();
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["tModLoader.zip"]).await;
    mount_archive(&server, "tModLoader.zip", zip_files(&[("a.txt", "a")])).await;

    let installer = env.installer(&server);
    let target = env.target();

    let first = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap();
    assert!(first.backup.is_none());

    let second = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap();
    let backup = second.backup.unwrap();
    assert_eq!(read_tree(&backup.path)["a.txt"], b"a");

    let third = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap();
    let listed = installer.backups().list_backups().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], third.backup.unwrap());
}

#[tokio::test]
async fn test_backup_failure_aborts_before_download() {
    let env = TestEnv::new();
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["tModLoader.zip"]).await;
    Mock::given(method("GET"))
        .and(path("/files/tModLoader.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_files(&[("a.txt", "a")])))
        .expect(0)
        .mount(&server)
        .await;

    fs::create_dir_all(env.root()).unwrap();
    fs::write(env.root().join("backups"), "not a directory").unwrap();
    let target = env.target();
    write_tree(&target, &[("old.txt", "old")]);
    let before = read_tree(&target);

    let installer = env.installer(&server);
    let err = installer.install(RELEASE_URL, &target, &NoProgress).await.unwrap_err();

    assert!(matches!(err, InstallerError::BackupError { .. }));
    assert_eq!(err.stage(), "backup");
    assert_eq!(read_tree(&target), before);
    assert!(!env.root().join("downloads/tModLoader_temp.zip").exists());
}
