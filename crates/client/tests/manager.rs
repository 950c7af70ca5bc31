#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Client manager CRUD and cache-path behavior.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use {
    akocef_client::{CefConfig, ClientManager},
    common::FakeLauncher,
};

#[tokio::test]
async fn add_get_remove_roundtrip() {
    let manager = ClientManager::new(CefConfig::default(), FakeLauncher::new());

    let client = manager.add_client().await.unwrap();
    assert_eq!(manager.active_count().await, 1);

    let found = manager.get_client(client.id()).await.unwrap();
    assert!(Arc::ptr_eq(&client, &found));

    manager.remove_client(client.id()).await;
    assert_eq!(manager.active_count().await, 0);
    assert!(manager.get_client(client.id()).await.is_none());
}

#[tokio::test]
async fn remove_unknown_id_is_a_noop() {
    let manager = ClientManager::new(CefConfig::default(), FakeLauncher::new());
    manager.remove_client(Uuid::new_v4()).await;
    assert_eq!(manager.active_count().await, 0);
}

#[tokio::test]
async fn clients_get_distinct_cache_paths_under_root() {
    let root = tempfile::tempdir().unwrap();
    let config = CefConfig {
        cache_root: Some(root.path().join("profiles")),
        ..CefConfig::default()
    };
    let launcher = FakeLauncher::new();
    let manager = ClientManager::new(config, launcher.clone());

    let a = manager.add_client().await.unwrap();
    let b = manager.add_client().await.unwrap();

    assert_ne!(a.id(), b.id());
    let path_a = a.cache_path().unwrap();
    let path_b = b.cache_path().unwrap();
    assert_ne!(path_a, path_b);
    assert!(path_a.starts_with(root.path().join("profiles")));

    // The launcher was handed the same paths the clients report.
    let seen = launcher.launched_paths.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![Some(path_a.to_path_buf()), Some(path_b.to_path_buf())]
    );
}

#[tokio::test]
async fn no_cache_root_means_no_cache_paths() {
    let manager = ClientManager::new(CefConfig::default(), FakeLauncher::new());
    let client = manager.add_client().await.unwrap();
    assert_eq!(client.cache_path(), None);
}

#[tokio::test]
async fn startup_clears_stale_caches_when_configured() {
    let root = tempfile::tempdir().unwrap();
    let cache_root = root.path().join("profiles");
    std::fs::create_dir_all(cache_root.join("old-profile")).unwrap();
    std::fs::write(cache_root.join("old-profile/cookies"), b"stale").unwrap();

    let config = CefConfig {
        cache_root: Some(cache_root.clone()),
        clear_cache_on_start: true,
        ..CefConfig::default()
    };
    let _manager = ClientManager::new(config, FakeLauncher::new());
    assert!(!cache_root.exists());
}

#[tokio::test]
async fn startup_keeps_caches_when_clearing_disabled() {
    let root = tempfile::tempdir().unwrap();
    let cache_root = root.path().join("profiles");
    std::fs::create_dir_all(&cache_root).unwrap();

    let config = CefConfig {
        cache_root: Some(cache_root.clone()),
        clear_cache_on_start: false,
        ..CefConfig::default()
    };
    let _manager = ClientManager::new(config, FakeLauncher::new());
    assert!(cache_root.exists());
}

#[tokio::test]
async fn shutdown_closes_every_client() {
    let manager = ClientManager::new(CefConfig::default(), FakeLauncher::new());
    manager.add_client().await.unwrap();
    manager.add_client().await.unwrap();
    assert_eq!(manager.active_count().await, 2);

    manager.shutdown().await;
    assert_eq!(manager.active_count().await, 0);
}
