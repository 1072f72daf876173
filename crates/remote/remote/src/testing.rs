use std::time::Duration;

use bytes::Bytes;

use crate::error::RemoteError;
use crate::store::DynRemoteStore;

const LEASE_TTL: Duration = Duration::from_secs(60);

async fn seed(
    store: &dyn DynRemoteStore,
    container: &str,
    name: &str,
    content: &'static [u8],
) -> Result<(), RemoteError> {
    store.create_container(container).await?;
    store
        .put_object(container, name, Bytes::from_static(content), "text/plain", None)
        .await
}

/// Run the full remote store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_remote_store_conformance_tests(
    store: &dyn DynRemoteStore,
) -> Result<(), RemoteError> {
    test_container_lifecycle(store).await?;
    test_missing_object(store).await?;
    test_put_get_roundtrip(store).await?;
    test_overwrite(store).await?;
    test_delete_is_idempotent(store).await?;
    test_lease_cycle(store).await?;
    test_lease_guards_writes(store).await?;
    test_lease_read_rules(store).await?;
    test_lease_on_unleased_object(store).await?;
    test_listing(store).await?;
    Ok(())
}

async fn test_container_lifecycle(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    let exists = store.container_exists("conf-lifecycle").await?;
    assert!(!exists, "container should not exist before creation");

    store.create_container("conf-lifecycle").await?;
    let exists = store.container_exists("conf-lifecycle").await?;
    assert!(exists, "container should exist after creation");

    // Creating again is a no-op, not an error.
    store.create_container("conf-lifecycle").await?;
    let exists = store.container_exists("conf-lifecycle").await?;
    assert!(exists, "container should survive repeated creation");
    Ok(())
}

async fn test_missing_object(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    store.create_container("conf-missing").await?;

    let exists = store.object_exists("conf-missing", "absent.txt").await?;
    assert!(!exists, "object_exists on a missing object should be false");

    let err = store
        .get_object("conf-missing", "absent.txt", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "get on a missing object should fail");

    let err = store
        .object_properties("conf-missing", "absent.txt")
        .await
        .unwrap_err();
    assert!(
        err.is_not_found(),
        "properties on a missing object should fail"
    );

    let exists = store.object_exists("conf-no-container", "x.txt").await?;
    assert!(
        !exists,
        "object_exists in a missing container should be false, not an error"
    );
    Ok(())
}

async fn test_put_get_roundtrip(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-roundtrip", "a/x.txt", b"hello").await?;

    let exists = store.object_exists("conf-roundtrip", "a/x.txt").await?;
    assert!(exists, "object should exist after put");

    let object = store.get_object("conf-roundtrip", "a/x.txt", None).await?;
    assert_eq!(object.content.as_ref(), b"hello");
    assert_eq!(object.content_type, "text/plain");

    let props = store.object_properties("conf-roundtrip", "a/x.txt").await?;
    assert_eq!(props.content_length, 5);
    assert_eq!(props.content_type, "text/plain");
    Ok(())
}

async fn test_overwrite(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-overwrite", "doc.txt", b"first").await?;
    store
        .put_object(
            "conf-overwrite",
            "doc.txt",
            Bytes::from_static(b"{\"second\":true}"),
            "application/json",
            None,
        )
        .await?;

    let object = store.get_object("conf-overwrite", "doc.txt", None).await?;
    assert_eq!(object.content.as_ref(), b"{\"second\":true}");
    assert_eq!(
        object.content_type, "application/json",
        "overwrite should replace the content type"
    );

    let props = store.object_properties("conf-overwrite", "doc.txt").await?;
    assert_eq!(props.content_length, 15, "overwrite should replace the content");
    Ok(())
}

async fn test_delete_is_idempotent(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-delete", "gone.txt", b"bye").await?;

    store.delete_object("conf-delete", "gone.txt", None).await?;
    let exists = store.object_exists("conf-delete", "gone.txt").await?;
    assert!(!exists, "object should be gone after delete");

    // Deleting an absent object is a no-op.
    store.delete_object("conf-delete", "gone.txt", None).await?;
    Ok(())
}

async fn test_lease_cycle(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-lease-cycle", "leased.txt", b"data").await?;

    let token = store
        .acquire_lease("conf-lease-cycle", "leased.txt", LEASE_TTL)
        .await?;
    assert!(!token.is_empty(), "acquired lease token should not be empty");

    let err = store
        .acquire_lease("conf-lease-cycle", "leased.txt", LEASE_TTL)
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseAlreadyPresent),
        "second acquire should report the active lease"
    );

    store
        .release_lease("conf-lease-cycle", "leased.txt", &token)
        .await?;

    let second = store
        .acquire_lease("conf-lease-cycle", "leased.txt", LEASE_TTL)
        .await?;
    assert_ne!(second, token, "re-acquired lease should get a fresh token");
    store
        .release_lease("conf-lease-cycle", "leased.txt", &second)
        .await?;
    Ok(())
}

async fn test_lease_guards_writes(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-lease-writes", "guarded.txt", b"v1").await?;
    let token = store
        .acquire_lease("conf-lease-writes", "guarded.txt", LEASE_TTL)
        .await?;

    let err = store
        .put_object(
            "conf-lease-writes",
            "guarded.txt",
            Bytes::from_static(b"v2"),
            "text/plain",
            None,
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseIdMissing),
        "put without a lease on a leased object should fail"
    );

    let err = store
        .put_object(
            "conf-lease-writes",
            "guarded.txt",
            Bytes::from_static(b"v2"),
            "text/plain",
            Some("not-the-lease"),
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseIdMismatch),
        "put with the wrong lease should fail"
    );

    store
        .put_object(
            "conf-lease-writes",
            "guarded.txt",
            Bytes::from_static(b"v2"),
            "text/plain",
            Some(&token),
        )
        .await?;

    let err = store
        .delete_object("conf-lease-writes", "guarded.txt", None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseIdMissing),
        "delete without a lease on a leased object should fail"
    );

    store
        .delete_object("conf-lease-writes", "guarded.txt", Some(&token))
        .await?;
    let exists = store.object_exists("conf-lease-writes", "guarded.txt").await?;
    assert!(!exists, "delete with the matching lease should succeed");
    Ok(())
}

async fn test_lease_read_rules(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-lease-reads", "readable.txt", b"data").await?;
    let token = store
        .acquire_lease("conf-lease-reads", "readable.txt", LEASE_TTL)
        .await?;

    // A lease held elsewhere does not block plain reads.
    let object = store
        .get_object("conf-lease-reads", "readable.txt", None)
        .await?;
    assert_eq!(object.content.as_ref(), b"data");

    let err = store
        .get_object("conf-lease-reads", "readable.txt", Some("not-the-lease"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseIdMismatch),
        "read with the wrong lease should fail"
    );

    let object = store
        .get_object("conf-lease-reads", "readable.txt", Some(&token))
        .await?;
    assert_eq!(object.content.as_ref(), b"data");

    store
        .release_lease("conf-lease-reads", "readable.txt", &token)
        .await?;
    Ok(())
}

async fn test_lease_on_unleased_object(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    seed(store, "conf-unleased", "free.txt", b"data").await?;

    let err = store
        .put_object(
            "conf-unleased",
            "free.txt",
            Bytes::from_static(b"update"),
            "text/plain",
            Some("ghost-lease"),
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseNotPresent),
        "put with a lease on an unleased object should fail"
    );

    let err = store
        .get_object("conf-unleased", "free.txt", Some("ghost-lease"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseNotPresent),
        "get with a lease on an unleased object should fail"
    );

    let err = store
        .release_lease("conf-unleased", "free.txt", "ghost-lease")
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::LeaseNotPresent),
        "release on an unleased object should fail"
    );
    Ok(())
}

async fn test_listing(store: &dyn DynRemoteStore) -> Result<(), RemoteError> {
    store.create_container("conf-listing").await?;
    for name in ["b.txt", "a/two.txt", "a/one.txt"] {
        store
            .put_object(
                "conf-listing",
                name,
                Bytes::from_static(b"x"),
                "text/plain",
                None,
            )
            .await?;
    }

    let names = store.list_objects("conf-listing", None).await?;
    assert_eq!(
        names,
        vec![
            "a/one.txt".to_owned(),
            "a/two.txt".to_owned(),
            "b.txt".to_owned()
        ],
        "listing should be lexicographically ordered"
    );

    let names = store.list_objects("conf-listing", Some("a/")).await?;
    assert_eq!(
        names,
        vec!["a/one.txt".to_owned(), "a/two.txt".to_owned()],
        "prefix should restrict the listing"
    );

    let names = store.list_objects("conf-listing", Some("zzz")).await?;
    assert!(names.is_empty(), "non-matching prefix should yield nothing");

    let err = store
        .list_objects("conf-never-created", None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, RemoteError::ContainerNotFound(_)),
        "listing a missing container should fail"
    );
    Ok(())
}
