use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use wavelift::application::ports::{TransferStore, TransferStoreError};
use wavelift::application::services::{
    BytesPartSource, SessionState, TransferStage, UploadSession,
};
use wavelift::domain::{ObjectKey, partition};

use crate::helpers::{RecordingStore, StoreCall};

fn key() -> ObjectKey {
    ObjectKey::from_raw("audio/session.wav").unwrap()
}

async fn open(store: &Arc<RecordingStore>) -> UploadSession {
    let dyn_store: Arc<dyn TransferStore> = store.clone();
    UploadSession::open(dyn_store, &key()).await.unwrap()
}

#[tokio::test]
async fn given_three_parts_when_uploading_all_then_session_completes_in_order() {
    let store = Arc::new(RecordingStore::new());
    let mut session = open(&store).await;
    let mut source = BytesPartSource::new(vec![7u8; 250]);

    let e_tag = session
        .upload_all(partition(250, 100).unwrap(), &mut source, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(e_tag.as_deref(), Some("final-etag"));
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(
        session.parts().iter().map(|p| p.part_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Initiate("audio/session.wav".to_string()),
            StoreCall::Part(1, 100),
            StoreCall::Part(2, 100),
            StoreCall::Part(3, 50),
            StoreCall::Complete(3),
        ]
    );
}

#[tokio::test]
async fn given_part_two_of_five_fails_when_uploading_all_then_aborts_once_and_stops() {
    let store = Arc::new(RecordingStore::failing_part(2));
    let mut session = open(&store).await;
    let mut source = BytesPartSource::new(vec![0u8; 500]);

    let err = session
        .upload_all(partition(500, 100).unwrap(), &mut source, Duration::ZERO)
        .await
        .unwrap_err();

    assert_eq!(err.stage, TransferStage::Part(2));
    assert!(matches!(err.source, TransferStoreError::Backend(_)));
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 1);
    assert_eq!(store.count(|c| matches!(c, StoreCall::Part(n, _) if *n >= 3)), 0);
    assert_eq!(store.count(|c| matches!(c, StoreCall::Complete(_))), 0);
}

#[tokio::test]
async fn given_source_shorter_than_ranges_when_uploading_all_then_read_failure_aborts() {
    let store = Arc::new(RecordingStore::new());
    let mut session = open(&store).await;
    let mut source = BytesPartSource::new(vec![0u8; 150]);

    let err = session
        .upload_all(partition(300, 100).unwrap(), &mut source, Duration::ZERO)
        .await
        .unwrap_err();

    assert_eq!(err.stage, TransferStage::Part(2));
    assert!(matches!(err.source, TransferStoreError::Io(_)));
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 1);
}

#[tokio::test]
async fn given_no_parts_when_completing_then_fails_and_aborts() {
    let store = Arc::new(RecordingStore::new());
    let mut session = open(&store).await;

    let err = session.complete().await.unwrap_err();

    assert_eq!(err.stage, TransferStage::Complete);
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 1);
    assert_eq!(store.count(|c| matches!(c, StoreCall::Complete(_))), 0);
}

#[tokio::test]
async fn given_out_of_order_part_when_uploading_then_session_aborts() {
    let store = Arc::new(RecordingStore::new());
    let mut session = open(&store).await;

    let err = session
        .upload_part(2, Bytes::from_static(b"data"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, TransferStage::Part(2));
    assert!(matches!(err.source, TransferStoreError::InvalidState(_)));
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(store.count(|c| matches!(c, StoreCall::Part(..))), 0);
}

#[tokio::test]
async fn given_aborted_session_when_uploading_again_then_rejects_without_second_abort() {
    let store = Arc::new(RecordingStore::failing_part(1));
    let mut session = open(&store).await;
    let _ = session.upload_part(1, Bytes::from_static(b"first")).await;

    let err = session
        .upload_part(1, Bytes::from_static(b"retry"))
        .await
        .unwrap_err();

    assert!(matches!(err.source, TransferStoreError::InvalidState(_)));
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 1);
    assert_eq!(store.count(|c| matches!(c, StoreCall::Part(..))), 1);

    session.abort().await;
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 1);
}

#[tokio::test]
async fn given_completed_session_when_completing_again_then_rejects_without_abort() {
    let store = Arc::new(RecordingStore::new());
    let mut session = open(&store).await;
    session
        .upload_part(1, Bytes::from_static(b"only part"))
        .await
        .unwrap();
    session.complete().await.unwrap();

    let err = session.complete().await.unwrap_err();

    assert_eq!(err.stage, TransferStage::Complete);
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(store.count(|c| *c == StoreCall::Abort), 0);
}

#[tokio::test]
async fn given_fresh_session_when_opened_then_state_is_session_open() {
    let store = Arc::new(RecordingStore::new());

    let session = open(&store).await;

    assert_eq!(session.state(), SessionState::SessionOpen);
    assert!(session.parts().is_empty());
}

#[test]
fn given_lifecycle_when_checking_transitions_then_only_forward_edges_are_legal() {
    use SessionState::*;

    assert!(Uninitialized.can_transition_to(CredentialsObtained));
    assert!(CredentialsObtained.can_transition_to(SessionOpen));
    assert!(SessionOpen.can_transition_to(PartsUploading));
    assert!(PartsUploading.can_transition_to(PartsUploading));
    assert!(PartsUploading.can_transition_to(Completed));
    assert!(SessionOpen.can_transition_to(Aborted));
    assert!(PartsUploading.can_transition_to(Aborted));

    assert!(!Uninitialized.can_transition_to(SessionOpen));
    assert!(!CredentialsObtained.can_transition_to(Aborted));
    assert!(!SessionOpen.can_transition_to(Completed));
    assert!(!Completed.can_transition_to(Aborted));
    assert!(!Aborted.can_transition_to(PartsUploading));
}
