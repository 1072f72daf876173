//! Lease lifecycle tests: acquisition, conditional writes, guarded reads,
//! release, and fixed-duration expiry.

use std::sync::Arc;
use std::time::Duration;

use cumulo_core::{Blob, Lease};
use cumulo_remote_memory::MemoryRemoteStore;
use cumulo_storage::{BlobOperations, StorageFactory};

const ENDPOINT: &str = "memory://integration-tests";
const CONTAINER_ONE: &str = "test-container-one";
const BLOB_NAME: &str = "a/x.txt";

async fn seeded_ops() -> BlobOperations {
    let factory = StorageFactory::new(Arc::new(MemoryRemoteStore::new()));
    factory
        .container_operations(ENDPOINT, CONTAINER_ONE)
        .expect("container operations should build")
        .create_if_not_exists()
        .await
        .expect("container should be created");
    let ops = factory
        .blob_operations(ENDPOINT, CONTAINER_ONE)
        .expect("blob operations should build");
    ops.upload(&Blob::new(BLOB_NAME, "hello", "text/plain"), None)
        .await
        .expect("seed upload should succeed");
    ops
}

#[tokio::test]
async fn acquire_returns_lease_bound_to_blob() {
    let ops = seeded_ops().await;
    let lease = ops.acquire_lease(BLOB_NAME).await.unwrap();

    assert_eq!(lease.blob_name(), BLOB_NAME);
    assert!(!lease.token().is_empty());
    assert!(lease.is_for(BLOB_NAME));
}

#[tokio::test]
async fn acquire_on_missing_blob_fails() {
    let ops = seeded_ops().await;
    let err = ops.acquire_lease("absent.txt").await.unwrap_err();

    assert_eq!(err.to_string(), "blob absent.txt does not exist");
    assert_eq!(err.remote_cause().unwrap().code(), "ObjectNotFound");
}

#[tokio::test]
async fn double_acquire_reports_active_lease() {
    let ops = seeded_ops().await;
    let _held = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let err = ops.acquire_lease(BLOB_NAME).await.unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseAlreadyPresent");
    assert!(err.to_string().contains("acquiring a lease"));
}

#[tokio::test]
async fn upload_without_lease_while_leased_fails() {
    let ops = seeded_ops().await;
    let _held = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let err = ops
        .upload(&Blob::new(BLOB_NAME, "update", "text/plain"), None)
        .await
        .unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseIdMissing");
}

#[tokio::test]
async fn upload_with_lease_succeeds() {
    let ops = seeded_ops().await;
    let lease = ops.acquire_lease(BLOB_NAME).await.unwrap();

    ops.upload(&Blob::new(BLOB_NAME, "update", "text/plain"), Some(&lease))
        .await
        .unwrap();

    let downloaded = ops.leased_download(BLOB_NAME, &lease).await.unwrap();
    assert_eq!(downloaded.content().as_ref(), b"update");
}

#[tokio::test]
async fn plain_download_is_not_blocked_by_lease() {
    let ops = seeded_ops().await;
    let _held = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let downloaded = ops.download(BLOB_NAME).await.unwrap();
    assert_eq!(downloaded.content().as_ref(), b"hello");
}

#[tokio::test]
async fn leased_download_with_foreign_token_fails_remotely() {
    let ops = seeded_ops().await;
    let _held = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let foreign = Lease::new(BLOB_NAME, "11111111-2222-3333-4444-555555555555");
    let err = ops.leased_download(BLOB_NAME, &foreign).await.unwrap_err();

    assert!(!err.is_invalid_argument());
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseIdMismatch");
}

#[tokio::test]
async fn lease_on_unleased_blob_is_refused() {
    let ops = seeded_ops().await;
    let ghost = Lease::new(BLOB_NAME, "11111111-2222-3333-4444-555555555555");

    let err = ops.leased_download(BLOB_NAME, &ghost).await.unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseNotPresent");
}

#[tokio::test]
async fn release_then_reacquire_gets_fresh_token() {
    let ops = seeded_ops().await;
    let first = ops.acquire_lease(BLOB_NAME).await.unwrap();

    ops.release_lease(&first).await.unwrap();
    let second = ops.acquire_lease(BLOB_NAME).await.unwrap();

    assert_ne!(second.token(), first.token());
}

#[tokio::test]
async fn release_of_lapsed_lease_is_refused() {
    let ops = seeded_ops().await;
    let first = ops.acquire_lease(BLOB_NAME).await.unwrap();
    ops.release_lease(&first).await.unwrap();

    let err = ops.release_lease(&first).await.unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseNotPresent");
}

#[tokio::test]
async fn delete_is_guarded_by_lease() {
    let ops = seeded_ops().await;
    let lease = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let err = ops.delete(BLOB_NAME, None).await.unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseIdMissing");

    ops.delete(BLOB_NAME, Some(&lease)).await.unwrap();
    assert!(!ops.exists(BLOB_NAME).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn lease_expires_after_fixed_duration() {
    let ops = seeded_ops().await;
    let _held = ops.acquire_lease(BLOB_NAME).await.unwrap();

    let err = ops
        .upload(&Blob::new(BLOB_NAME, "update", "text/plain"), None)
        .await
        .unwrap_err();
    assert_eq!(err.remote_cause().unwrap().code(), "LeaseIdMissing");

    tokio::time::advance(Duration::from_secs(61)).await;

    // The lease has lapsed server-side; writes and a fresh acquire succeed.
    ops.upload(&Blob::new(BLOB_NAME, "update", "text/plain"), None)
        .await
        .unwrap();
    let fresh = ops.acquire_lease(BLOB_NAME).await.unwrap();
    assert!(!fresh.token().is_empty());
}
