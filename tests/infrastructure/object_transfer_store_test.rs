use std::time::Duration;

use bytes::Bytes;

use wavelift::application::ports::{TransferStore, TransferStoreError};
use wavelift::domain::ObjectKey;
use wavelift::infrastructure::storage::{
    InMemoryTransferStore, OssTransferStore, virtual_hosted_endpoint,
};

use crate::helpers::valid_credentials;

fn key(raw: &str) -> ObjectKey {
    ObjectKey::from_raw(raw).unwrap()
}

#[tokio::test]
async fn given_put_object_when_checking_existence_then_object_is_found() {
    let store = InMemoryTransferStore::in_memory();
    let key = key("audio/a.wav");

    store
        .put_object(&key, Bytes::from_static(b"payload"))
        .await
        .unwrap();

    assert!(store.object_exists(&key).await.unwrap());
    assert_eq!(&store.fetch(&key).await.unwrap()[..], b"payload");
}

#[tokio::test]
async fn given_missing_object_when_checking_existence_then_returns_false() {
    let store = InMemoryTransferStore::in_memory();

    assert!(!store.object_exists(&key("audio/none.wav")).await.unwrap());
    assert!(matches!(
        store.fetch(&key("audio/none.wav")).await,
        Err(TransferStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_multipart_parts_when_completing_then_object_is_concatenated_in_order() {
    let store = InMemoryTransferStore::in_memory();
    let key = key("audio/multi.wav");

    let handle = store.initiate_multipart(&key).await.unwrap();
    let first = store
        .upload_part(&handle, 1, Bytes::from_static(b"hello "))
        .await
        .unwrap();
    let second = store
        .upload_part(&handle, 2, Bytes::from_static(b"world"))
        .await
        .unwrap();
    let e_tag = store
        .complete_multipart(&handle, &[first, second])
        .await
        .unwrap();

    assert!(e_tag.is_some());
    assert_eq!(&store.fetch(&key).await.unwrap()[..], b"hello world");
}

#[tokio::test]
async fn given_aborted_multipart_when_checking_existence_then_object_is_absent() {
    let store = InMemoryTransferStore::in_memory();
    let key = key("audio/aborted.wav");

    let handle = store.initiate_multipart(&key).await.unwrap();
    store
        .upload_part(&handle, 1, Bytes::from_static(b"partial"))
        .await
        .unwrap();
    store.abort_multipart(&handle).await.unwrap();

    assert!(!store.object_exists(&key).await.unwrap());
}

#[tokio::test]
async fn given_part_number_zero_when_uploading_then_returns_invalid_state() {
    let store = InMemoryTransferStore::in_memory();
    let handle = store.initiate_multipart(&key("audio/x.wav")).await.unwrap();

    let result = store
        .upload_part(&handle, 0, Bytes::from_static(b"x"))
        .await;

    assert!(matches!(result, Err(TransferStoreError::InvalidState(_))));
}

#[tokio::test]
async fn given_memory_store_when_signing_then_url_carries_key_and_ttl() {
    let store = InMemoryTransferStore::in_memory();

    let url = store
        .signed_url(&key("audio/a.wav"), Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(url, "memory:///audio/a.wav?expires_in=60");
}

#[tokio::test]
async fn given_oss_store_when_signing_then_url_is_presigned_on_bucket_host() {
    let store = OssTransferStore::oss(
        "https://oss-cn-shanghai.aliyuncs.com",
        "speech-audio",
        "oss-cn-shanghai",
        &valid_credentials(),
    )
    .unwrap();

    let url = store
        .signed_url(&key("audio/req/part_1.wav"), Duration::from_secs(3600))
        .await
        .unwrap();

    assert!(url.starts_with("https://speech-audio.oss-cn-shanghai.aliyuncs.com/"));
    assert!(url.contains("part_1.wav"));
    assert!(url.contains("X-Amz-Signature="));
    assert!(url.contains("X-Amz-Expires=3600"));
}

#[test]
fn given_region_endpoint_when_building_virtual_host_then_bucket_is_prepended() {
    assert_eq!(
        virtual_hosted_endpoint("https://oss-cn-shanghai.aliyuncs.com/", "bucket").unwrap(),
        "https://bucket.oss-cn-shanghai.aliyuncs.com"
    );
}

#[test]
fn given_endpoint_already_bucket_scoped_when_building_virtual_host_then_unchanged() {
    assert_eq!(
        virtual_hosted_endpoint("https://bucket.oss-cn-shanghai.aliyuncs.com", "bucket").unwrap(),
        "https://bucket.oss-cn-shanghai.aliyuncs.com"
    );
}

#[test]
fn given_endpoint_without_scheme_when_building_virtual_host_then_returns_configuration_error() {
    assert!(matches!(
        virtual_hosted_endpoint("oss-cn-shanghai.aliyuncs.com", "bucket"),
        Err(TransferStoreError::Configuration(_))
    ));
}
