//! Container-level tests: existence, idempotent creation and prefix
//! listing.

use std::sync::Arc;

use cumulo_core::Blob;
use cumulo_remote_memory::MemoryRemoteStore;
use cumulo_storage::{ContainerOperations, StorageFactory};

const ENDPOINT: &str = "memory://integration-tests";
const CONTAINER_ONE: &str = "test-container-one";

fn factory() -> StorageFactory {
    StorageFactory::new(Arc::new(MemoryRemoteStore::new()))
}

async fn seeded() -> ContainerOperations {
    let factory = factory();
    let containers = factory
        .container_operations(ENDPOINT, CONTAINER_ONE)
        .expect("container operations should build");
    containers
        .create_if_not_exists()
        .await
        .expect("container should be created");

    let blobs = factory
        .blob_operations(ENDPOINT, CONTAINER_ONE)
        .expect("blob operations should build");
    for name in ["b.txt", "a/two.txt", "a/one.txt"] {
        blobs
            .upload(&Blob::new(name, "x", "text/plain"), None)
            .await
            .expect("seed upload should succeed");
    }
    containers
}

#[tokio::test]
async fn exists_then_create_then_exists() {
    let ops = factory()
        .container_operations(ENDPOINT, CONTAINER_ONE)
        .unwrap();

    assert!(!ops.exists().await.unwrap());
    ops.create_if_not_exists().await.unwrap();
    assert!(ops.exists().await.unwrap());
}

#[tokio::test]
async fn create_is_idempotent() {
    let ops = factory()
        .container_operations(ENDPOINT, CONTAINER_ONE)
        .unwrap();

    ops.create_if_not_exists().await.unwrap();
    ops.create_if_not_exists().await.unwrap();
    assert!(ops.exists().await.unwrap());
}

#[tokio::test]
async fn name_reports_container() {
    let ops = factory()
        .container_operations(ENDPOINT, CONTAINER_ONE)
        .unwrap();
    assert_eq!(ops.name(), CONTAINER_ONE);
}

#[tokio::test]
async fn blob_names_are_sorted() {
    let containers = seeded().await;
    let names = containers.blob_names(None).await.unwrap();
    assert_eq!(names, vec!["a/one.txt", "a/two.txt", "b.txt"]);
}

#[tokio::test]
async fn blob_names_filters_by_prefix() {
    let containers = seeded().await;
    let names = containers.blob_names(Some("a/")).await.unwrap();
    assert_eq!(names, vec!["a/one.txt", "a/two.txt"]);
}

#[tokio::test]
async fn non_matching_prefix_yields_empty() {
    let containers = seeded().await;
    let names = containers.blob_names(Some("zzz")).await.unwrap();
    assert!(names.is_empty());
}

#[tokio::test]
async fn listing_missing_container_fails() {
    let ops = factory()
        .container_operations(ENDPOINT, "never-created")
        .unwrap();

    let err = ops.blob_names(None).await.unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "ContainerNotFound");
    assert_eq!(err.container(), Some("never-created"));
}
