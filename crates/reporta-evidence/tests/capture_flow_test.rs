//! End-to-end capture flows over the public API, with a mock camera.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reporta_core::{Attachment, CameraConfig, EvidencePolicy, NoticeLevel};
use reporta_evidence::testing::{MockCamera, RecordingSink};
use reporta_evidence::{CameraController, CaptureSession, EvidenceField, SessionState};

fn setup(camera: Arc<MockCamera>) -> (CaptureSession, EvidenceField, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let controller = CameraController::new(camera, CameraConfig::default());
    let session = CaptureSession::new(controller, sink.clone());
    let field = EvidenceField::new(EvidencePolicy::default(), sink.clone());
    (session, field, sink)
}

fn upload(name: &str) -> Attachment {
    Attachment::from_upload(name, "image/jpeg", Bytes::from(vec![0u8; 2048]))
}

#[tokio::test]
async fn full_capture_review_cycle() {
    let camera = Arc::new(MockCamera::with_streams(8, 8));
    let (mut session, mut field, _sink) = setup(camera.clone());

    assert_eq!(session.state(), SessionState::Idle);
    session.open().await.unwrap();
    assert_eq!(session.state(), SessionState::Live);

    session.capture(&field).await.unwrap();
    assert_eq!(session.state(), SessionState::Previewing);

    session.retake();
    assert_eq!(session.state(), SessionState::Live);

    session.capture(&field).await.unwrap();
    let preview = session.pending_preview().cloned().unwrap();

    session.confirm(&mut field).unwrap();
    assert_eq!(session.state(), SessionState::Live);
    assert_eq!(field.store().len(), 1);
    assert!(preview.is_released());
    assert!(field.is_valid());
}

#[tokio::test]
async fn confirm_that_fills_cap_auto_closes_and_releases_device() {
    let camera = Arc::new(MockCamera::with_streams(8, 8));
    let (mut session, mut field, _sink) = setup(camera.clone());

    field.add_batch(vec![upload("a.jpg"), upload("b.jpg")]).unwrap();
    assert_eq!(field.store().remaining_capacity(), 1);

    session.open().await.unwrap();
    session.capture(&field).await.unwrap();
    session.confirm(&mut field).unwrap();

    assert_eq!(field.store().len(), 3);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(camera.all_streams_stopped());
}

#[tokio::test(start_paused = true)]
async fn abrupt_teardown_mid_acquisition_stops_late_stream() {
    // Device answers only after the 3s grace period has expired
    let camera = Arc::new(MockCamera::slow(Duration::from_secs(30), 16, 9));
    let (mut session, _field, _sink) = setup(camera.clone());

    // Grace expires, session optimistically goes live on a warming handle
    session.open().await.unwrap();
    assert_eq!(session.state(), SessionState::Live);

    // The user closes the dialog before the device ever responded
    session.close();
    assert_eq!(session.state(), SessionState::Idle);

    // When the stream finally arrives it must be stopped immediately
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(camera.streams_opened(), 1);
    assert!(camera.all_streams_stopped());
}

#[tokio::test]
async fn switch_facing_never_holds_two_open_streams() {
    let camera = Arc::new(MockCamera::with_streams(16, 9));
    let (mut session, _field, _sink) = setup(camera.clone());

    session.open().await.unwrap();
    session.switch_facing().await.unwrap();

    assert_eq!(session.state(), SessionState::Live);
    assert_eq!(camera.streams_opened(), 2);
    // Exactly one stream still open: the one acquired by the switch
    assert_eq!(camera.streams_still_open(), 1);

    session.close();
    assert!(camera.all_streams_stopped());
}

#[tokio::test]
async fn permission_denial_leaves_submission_blocked() {
    let camera = Arc::new(MockCamera::denied());
    let (mut session, field, sink) = setup(camera);

    assert!(session.open().await.is_err());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(sink.contains(NoticeLevel::Error, "permission denied"));

    // No evidence could be attached, so the form gate stays closed
    assert!(!field.is_valid());
    assert!(field.validation_message().is_some());
}

#[tokio::test]
async fn mixed_upload_and_capture_to_cap_then_clear() {
    let camera = Arc::new(MockCamera::with_streams(8, 8));
    let (mut session, mut field, _sink) = setup(camera.clone());

    field.add_batch(vec![upload("a.jpg")]).unwrap();

    session.open().await.unwrap();
    session.capture(&field).await.unwrap();
    session.confirm(&mut field).unwrap();
    session.capture(&field).await.unwrap();
    session.confirm(&mut field).unwrap();

    assert_eq!(field.store().len(), 3);
    assert_eq!(session.state(), SessionState::Idle); // auto-closed at cap

    let previews: Vec<_> = field
        .store()
        .attachments()
        .iter()
        .filter_map(|a| a.preview().cloned())
        .collect();
    assert_eq!(previews.len(), 3);

    // Successful-submission path clears everything and releases previews
    field.clear();
    assert!(field.store().is_empty());
    assert!(!field.is_valid());
    assert!(previews.iter().all(|p| p.is_released()));
}

#[tokio::test]
async fn capture_control_disabled_at_cap() {
    let camera = Arc::new(MockCamera::with_streams(8, 8));
    let (mut session, mut field, sink) = setup(camera);

    field
        .add_batch(vec![upload("a.jpg"), upload("b.jpg"), upload("c.jpg")])
        .unwrap();
    assert!(field.store().is_full());

    session.open().await.unwrap();
    assert!(!session.can_capture(&field));

    // Even if the control were pressed anyway, state stays Live and the
    // collection is untouched
    session.capture(&field).await.unwrap();
    assert_eq!(session.state(), SessionState::Live);
    assert_eq!(field.store().len(), 3);
    assert!(sink.contains(NoticeLevel::Warning, "Maximum 3 files allowed"));
}
