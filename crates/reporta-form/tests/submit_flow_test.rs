//! Submission flows over the public API, with mock lookup and backend.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reporta_core::{
    Attachment, DocumentKind, EvidencePolicy, FormConfig, IncidentReport, NoticeLevel,
    RelatedCategory, ReportKind,
};
use reporta_evidence::testing::RecordingSink;
use reporta_evidence::EvidenceField;
use reporta_form::{FormController, IdentityInfo, IdentityLookup, SubmitBackend, SubmitReceipt};

struct StaticLookup;

#[async_trait]
impl IdentityLookup for StaticLookup {
    async fn lookup(&self, _document_number: &str) -> Result<IdentityInfo> {
        Ok(IdentityInfo {
            full_name: "ANA QUISPE ROJAS".to_string(),
        })
    }
}

/// Backend double: scripted outcome, records what it was asked to persist
struct ScriptedBackend {
    fail_with: Option<String>,
    submissions: Mutex<Vec<(IncidentReport, usize)>>,
}

impl ScriptedBackend {
    fn accepting() -> Self {
        Self {
            fail_with: None,
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmitBackend for ScriptedBackend {
    async fn submit(
        &self,
        draft: &IncidentReport,
        evidence: &[Attachment],
    ) -> Result<SubmitReceipt> {
        self.submissions
            .lock()
            .unwrap()
            .push((draft.clone(), evidence.len()));
        match &self.fail_with {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(SubmitReceipt {
                message: Some("Reporte enviado exitosamente".to_string()),
                registration_number: Some("REP-2026-000123".to_string()),
            }),
        }
    }
}

fn controller(backend: Arc<ScriptedBackend>) -> (FormController, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let evidence = EvidenceField::new(EvidencePolicy::default(), sink.clone());
    let form = FormController::new(
        FormConfig::default(),
        evidence,
        Arc::new(StaticLookup),
        backend,
        sink.clone(),
    );
    (form, sink)
}

fn fill_draft(form: &mut FormController) {
    let draft = form.draft_mut();
    draft.document_kind = DocumentKind::Dni;
    draft.document_number = "12345678".to_string();
    draft.full_name = "Ana Quispe".to_string();
    draft.institutional_email = "ana.quispe@senati.pe".to_string();
    draft.reporter_name = "Ana Quispe".to_string();
    draft.area = "Área de Producción".to_string();
    draft.report_kind = Some(ReportKind::UnsafeCondition);
    draft.related_category = Some(RelatedCategory::Machinery);
    draft.location = "Taller 2".to_string();
    draft.occurred_at = Some(Utc::now());
    draft.observation = "Loose guard rail next to the lathe".to_string();
}

fn attach_evidence(form: &mut FormController) {
    form.evidence_mut()
        .add_batch(vec![Attachment::from_upload(
            "scene.jpg",
            "image/jpeg",
            Bytes::from(vec![0u8; 4096]),
        )])
        .unwrap();
}

#[tokio::test]
async fn successful_submission_clears_draft_and_evidence() {
    let backend = Arc::new(ScriptedBackend::accepting());
    let (mut form, sink) = controller(backend.clone());

    fill_draft(&mut form);
    attach_evidence(&mut form);
    let preview = form.evidence().store().attachments()[0]
        .preview()
        .cloned()
        .unwrap();
    assert!(form.can_submit());

    let receipt = form.submit().await.unwrap();
    assert_eq!(receipt.registration_number.as_deref(), Some("REP-2026-000123"));
    assert_eq!(backend.submission_count(), 1);

    // Draft reset, evidence cleared, previews released
    assert!(form.draft().document_number.is_empty());
    assert!(form.evidence().store().is_empty());
    assert!(preview.is_released());
    assert!(sink.contains(NoticeLevel::Success, "REP-2026-000123"));
}

#[tokio::test]
async fn failed_submission_keeps_everything_intact() {
    let backend = Arc::new(ScriptedBackend::failing("Storage quota exceeded"));
    let (mut form, sink) = controller(backend.clone());

    fill_draft(&mut form);
    attach_evidence(&mut form);

    assert!(form.submit().await.is_err());
    assert_eq!(backend.submission_count(), 1);

    // User can correct and retry: nothing was cleared
    assert_eq!(form.draft().document_number, "12345678");
    assert_eq!(form.evidence().store().len(), 1);
    assert!(!form.is_submitting());
    assert!(sink.contains(NoticeLevel::Error, "Storage quota exceeded"));
}

#[tokio::test]
async fn submission_blocked_without_evidence() {
    let backend = Arc::new(ScriptedBackend::accepting());
    let (mut form, sink) = controller(backend.clone());

    fill_draft(&mut form);
    assert!(!form.can_submit());

    assert!(form.submit().await.is_err());
    assert_eq!(backend.submission_count(), 0);
    assert!(sink.contains(NoticeLevel::Warning, "at least one evidence file"));
}

#[tokio::test]
async fn submission_blocked_by_invalid_draft() {
    let backend = Arc::new(ScriptedBackend::accepting());
    let (mut form, sink) = controller(backend.clone());

    fill_draft(&mut form);
    attach_evidence(&mut form);
    form.draft_mut().institutional_email = "ana@gmail.com".to_string();
    assert!(!form.can_submit());

    assert!(form.submit().await.is_err());
    assert_eq!(backend.submission_count(), 0);
    assert!(sink.contains(NoticeLevel::Warning, "must end with"));

    // Evidence untouched by the rejection
    assert_eq!(form.evidence().store().len(), 1);
}

#[tokio::test]
async fn backend_receives_evidence_in_insertion_order() {
    let backend = Arc::new(ScriptedBackend::accepting());
    let (mut form, _sink) = controller(backend.clone());

    fill_draft(&mut form);
    form.evidence_mut()
        .add_batch(vec![
            Attachment::from_upload("first.jpg", "image/jpeg", Bytes::from(vec![0u8; 64])),
            Attachment::from_upload("second.pdf", "application/pdf", Bytes::from(vec![0u8; 64])),
        ])
        .unwrap();

    form.submit().await.unwrap();
    let submissions = backend.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].1, 2);
}
