use crate::common::{RELEASE_URL, TAG, TestEnv, mount_archive, mount_release, run_cli};
use modloader_installer::config::Settings;
use modloader_installer::test_utils::{read_tree, write_tree, zip_files};
use predicates::prelude::*;
use std::fs;
use wiremock::MockServer;

async fn release_server() -> MockServer {
    let server = MockServer::start().await;
    mount_release(&server, TAG, &["tModLoader.zip"]).await;
    mount_archive(&server, "tModLoader.zip", zip_files(&[("tModLoader.dll", "new")])).await;
    server
}

#[tokio::test]
async fn test_help_lists_subcommands() {
    let env = TestEnv::new();
    run_cli(&env.root(), "http://127.0.0.1:9", &["--help"])
        .await
        .success()
        .stdout(predicate::str::contains("backups"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("prune"));
}

#[tokio::test]
async fn test_invalid_url_exits_with_error() {
    let env = TestEnv::new();
    let target = env.target();
    let target_arg = target.to_string_lossy().into_owned();

    run_cli(
        &env.root(),
        "http://127.0.0.1:9",
        &["https://github.com/tModLoader/tModLoader/releases", &target_arg],
    )
    .await
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Invalid release URL"));

    assert!(!target.exists());
}

#[tokio::test]
async fn test_install_saves_settings_and_reuses_them() {
    let env = TestEnv::new();
    let server = release_server().await;
    let target = env.target();
    write_tree(&target, &[("old.txt", "old")]);
    let target_arg = target.to_string_lossy().into_owned();

    run_cli(&env.root(), &server.uri(), &[RELEASE_URL, &target_arg])
        .await
        .success()
        .stdout(predicate::str::contains(TAG));

    let tree = read_tree(&target);
    assert_eq!(tree["old.txt"], b"old");
    assert_eq!(tree["tModLoader.dll"], b"new");

    let settings =
        Settings::load_from(&env.root().join("config/installer_settings.json")).await.unwrap();
    assert_eq!(settings.github_url.as_deref(), Some(RELEASE_URL));
    assert_eq!(settings.install_path.as_deref(), Some(target.as_path()));

    // No arguments: URL and path come from the saved settings.
    run_cli(&env.root(), &server.uri(), &[]).await.success();

    let backups = fs::read_dir(env.root().join("backups")).unwrap().count();
    assert_eq!(backups, 2);
}

#[tokio::test]
async fn test_missing_install_path_is_an_error() {
    let env = TestEnv::new();
    run_cli(&env.root(), "http://127.0.0.1:9", &[RELEASE_URL])
        .await
        .failure()
        .stderr(predicate::str::contains("No install path"));
}

#[tokio::test]
async fn test_backups_listing() {
    let env = TestEnv::new();
    let backups = env.root().join("backups");
    for name in ["tModLoader_backup_1", "tModLoader_backup_10", "tModLoader_backup_2"] {
        fs::create_dir_all(backups.join(name)).unwrap();
    }

    let assert = run_cli(&env.root(), "http://127.0.0.1:9", &["backups", "--names-only"])
        .await
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["tModLoader_backup_10", "tModLoader_backup_2", "tModLoader_backup_1"]
    );

    let with_time =
        predicate::str::is_match(r"tModLoader_backup_10.* \(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\)")
            .unwrap();
    run_cli(&env.root(), "http://127.0.0.1:9", &["backups"]).await.success().stdout(with_time);
}

#[tokio::test]
async fn test_empty_backups_listing() {
    let env = TestEnv::new();
    run_cli(&env.root(), "http://127.0.0.1:9", &["backups"])
        .await
        .success()
        .stdout(predicate::str::contains("No backups"));
}

#[tokio::test]
async fn test_restore_with_yes() {
    let env = TestEnv::new();
    let backup_dir = env.root().join("backups/tModLoader_backup_20250101_000000");
    write_tree(&backup_dir, &[("keep.txt", "k")]);
    let target = env.target();
    write_tree(&target, &[("drop.txt", "d")]);
    let target_arg = target.to_string_lossy().into_owned();

    run_cli(
        &env.root(),
        "http://127.0.0.1:9",
        &["restore", "tModLoader_backup_20250101_000000", &target_arg, "--yes"],
    )
    .await
    .success();

    let restored: Vec<String> = read_tree(&target).into_keys().collect();
    assert_eq!(restored, vec!["keep.txt"]);
    // Only a successful install records settings.
    assert!(!env.root().join("config/installer_settings.json").exists());
}

#[tokio::test]
async fn test_restore_unknown_backup() {
    let env = TestEnv::new();
    let target_arg = env.target().to_string_lossy().into_owned();

    run_cli(
        &env.root(),
        "http://127.0.0.1:9",
        &["restore", "tModLoader_backup_nope", &target_arg, "--yes"],
    )
    .await
    .failure()
    .stderr(predicate::str::contains("not found"));
}

#[tokio::test]
async fn test_delete_requires_confirmation_without_terminal() {
    let env = TestEnv::new();
    let backup = env.root().join("backups/tModLoader_backup_1");
    fs::create_dir_all(&backup).unwrap();

    run_cli(&env.root(), "http://127.0.0.1:9", &["delete", "tModLoader_backup_1"])
        .await
        .failure()
        .stderr(predicate::str::contains("--yes"));
    assert!(backup.exists());

    run_cli(&env.root(), "http://127.0.0.1:9", &["delete", "tModLoader_backup_1", "--yes"])
        .await
        .success();
    assert!(!backup.exists());
}

#[tokio::test]
async fn test_prune_keeps_newest() {
    let env = TestEnv::new();
    for n in 1..=4 {
        fs::create_dir_all(env.root().join(format!("backups/tModLoader_backup_{n}"))).unwrap();
    }

    run_cli(&env.root(), "http://127.0.0.1:9", &["prune", "--keep", "1", "--yes"])
        .await
        .success()
        .stdout(predicate::str::contains("tModLoader_backup_1"));

    let remaining: Vec<String> = fs::read_dir(env.root().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(remaining, vec!["tModLoader_backup_4"]);
}
