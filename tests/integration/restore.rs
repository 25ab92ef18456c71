use crate::common::TestEnv;
use modloader_installer::backup::BackupManager;
use modloader_installer::config::InstallerConfig;
use modloader_installer::test_utils::{read_tree, write_tree};
use modloader_installer::workflow::{Installer, Stage, WorkflowEvent};
use std::fs;

fn manager(env: &TestEnv) -> BackupManager {
    BackupManager::new(&InstallerConfig::new(env.root()))
}

#[tokio::test]
async fn test_backup_modify_restore_is_byte_identical() {
    let env = TestEnv::new();
    let manager = manager(&env);
    let target = env.target();
    write_tree(
        &target,
        &[
            ("tModLoader.dll", "build 1"),
            ("Libraries/a/b/c.dll", "deep"),
            ("savehook.json", "{\"enabled\": true}"),
        ],
    );
    fs::create_dir_all(target.join("EmptyDir")).unwrap();
    let snapshot = read_tree(&target);

    let backup = manager.create_backup(&target).await.unwrap().unwrap();

    fs::write(target.join("tModLoader.dll"), "build 2").unwrap();
    fs::remove_dir_all(target.join("Libraries")).unwrap();
    write_tree(&target, &[("added/new.txt", "new")]);
    assert_ne!(read_tree(&target), snapshot);

    manager.restore_backup(&backup, &target).await.unwrap();
    assert_eq!(read_tree(&target), snapshot);
    assert_eq!(read_tree(&backup.path), snapshot);
}

#[tokio::test]
async fn test_restore_leaves_only_backup_contents() {
    let env = TestEnv::new();
    let installer = Installer::new(InstallerConfig::new(env.root())).unwrap();
    let backup_dir = env.root().join("backups").join("tModLoader_backup_20250301_120000");
    write_tree(&backup_dir, &[("keep.txt", "keep")]);

    let target = env.target();
    write_tree(&target, &[("a.txt", "a"), ("b/c.txt", "c")]);

    let backup = installer.backups().find_backup("tModLoader_backup_20250301_120000").await.unwrap();
    let mut handle = installer.spawn_restore(backup, target.clone());
    let mut stages = Vec::new();
    while let Some(event) = handle.events.recv().await {
        if let WorkflowEvent::Stage(stage) = event {
            stages.push(stage);
        }
    }
    handle.task.await.unwrap().unwrap();

    let tree = read_tree(&target);
    assert_eq!(tree.keys().map(String::as_str).collect::<Vec<_>>(), vec!["keep.txt"]);
    assert_eq!(stages.first(), Some(&Stage::RestorePrep));
    assert_eq!(stages.last(), Some(&Stage::RestoreComplete));
    assert!(backup_dir.join("keep.txt").exists());
}

#[tokio::test]
async fn test_listing_newest_first_and_prune() {
    let env = TestEnv::new();
    let manager = manager(&env);
    for name in [
        "tModLoader_backup_20240101_000000",
        "tModLoader_backup_20250301_120000",
        "tModLoader_backup_20250301_120000_2",
        "tModLoader_backup_20241231_235959",
    ] {
        fs::create_dir_all(manager.backups_dir().join(name)).unwrap();
    }

    let names: Vec<String> =
        manager.list_backups().await.unwrap().into_iter().map(|b| b.name).collect();
    assert_eq!(
        names,
        vec![
            "tModLoader_backup_20250301_120000_2",
            "tModLoader_backup_20250301_120000",
            "tModLoader_backup_20241231_235959",
            "tModLoader_backup_20240101_000000",
        ]
    );

    let removed = manager.prune(2).await.unwrap();
    assert_eq!(removed.len(), 2);
    assert!(!manager.backups_dir().join("tModLoader_backup_20240101_000000").exists());
    assert!(manager.backups_dir().join("tModLoader_backup_20250301_120000_2").exists());
}
