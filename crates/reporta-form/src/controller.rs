//! Form controller
//!
//! Owns the report draft and the evidence field, and orchestrates the
//! identity lookup and the submission flow. All user feedback goes through
//! the notification sink; nothing here touches a rendering layer.

use std::sync::Arc;

use reporta_core::{
    DocumentKind, FormConfig, IncidentReport, NoticeMetadata, NotificationSink, ReportError,
};
use reporta_evidence::EvidenceField;

use crate::lookup::IdentityLookup;
use crate::schema::{is_complete_dni, validate_draft};
use crate::submit::{SubmitBackend, SubmitReceipt};

pub struct FormController {
    config: FormConfig,
    draft: IncidentReport,
    evidence: EvidenceField,
    lookup: Arc<dyn IdentityLookup>,
    backend: Arc<dyn SubmitBackend>,
    notify: Arc<dyn NotificationSink>,
    submitting: bool,
    lookup_failed: bool,
}

impl FormController {
    pub fn new(
        config: FormConfig,
        evidence: EvidenceField,
        lookup: Arc<dyn IdentityLookup>,
        backend: Arc<dyn SubmitBackend>,
        notify: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            draft: IncidentReport::default(),
            evidence,
            lookup,
            backend,
            notify,
            submitting: false,
            lookup_failed: false,
        }
    }

    pub fn draft(&self) -> &IncidentReport {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut IncidentReport {
        &mut self.draft
    }

    pub fn evidence(&self) -> &EvidenceField {
        &self.evidence
    }

    pub fn evidence_mut(&mut self) -> &mut EvidenceField {
        &mut self.evidence
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True when the last lookup failed and the name must be typed manually
    pub fn lookup_failed(&self) -> bool {
        self.lookup_failed
    }

    /// Changing the document kind clears the identity fields
    pub fn set_document_kind(&mut self, kind: DocumentKind) {
        if self.draft.document_kind != kind {
            self.draft.document_kind = kind;
            self.draft.document_number.clear();
            self.draft.full_name.clear();
            self.lookup_failed = false;
        }
    }

    /// Update the document number. A complete DNI number fires the identity
    /// lookup; other kinds are always entered manually.
    pub async fn set_document_number(&mut self, number: String) {
        self.draft.document_number = number;
        if self.draft.document_kind == DocumentKind::Dni
            && is_complete_dni(&self.draft.document_number)
        {
            self.run_lookup().await;
        }
    }

    async fn run_lookup(&mut self) {
        self.lookup_failed = false;
        self.draft.full_name.clear();

        match self.lookup.lookup(&self.draft.document_number).await {
            Ok(info) => {
                self.draft.full_name = info.full_name;
                self.notify.success("Identity data found");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Identity lookup failed");
                self.lookup_failed = true;
                let err = ReportError::LookupFailed(err.to_string());
                self.notify.notify(err.notice_level(), &err.user_message());
            }
        }
    }

    /// Submission gate: draft rules plus the non-empty evidence rule
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && validate_draft(&self.draft, &self.config).is_ok()
            && self.evidence.is_valid()
    }

    /// Submit the report. On success the draft and the evidence collection
    /// are cleared (previews released); on failure everything stays intact
    /// so the user can retry.
    pub async fn submit(&mut self) -> Result<SubmitReceipt, ReportError> {
        if self.submitting {
            return Err(ReportError::SubmitFailed(
                "A submission is already in progress".to_string(),
            ));
        }

        if let Err(errors) = validate_draft(&self.draft, &self.config) {
            let err = ReportError::ValidationRejected(errors.join("; "));
            self.notify.notify(err.notice_level(), &err.user_message());
            return Err(err);
        }
        if !self.evidence.is_valid() {
            let message = self
                .evidence
                .validation_message()
                .unwrap_or("Attach at least one evidence file")
                .to_string();
            let err = ReportError::ValidationRejected(message);
            self.notify.notify(err.notice_level(), &err.user_message());
            return Err(err);
        }

        self.submitting = true;
        let result = self
            .backend
            .submit(&self.draft, self.evidence.store().attachments())
            .await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                let message = match &receipt.registration_number {
                    Some(number) => {
                        format!("Report submitted successfully. Registration number: {}", number)
                    }
                    None => "Report submitted successfully".to_string(),
                };
                self.notify.success(&message);
                self.reset();
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Report submission failed");
                let err = ReportError::SubmitFailed(err.to_string());
                self.notify.notify(err.notice_level(), &err.user_message());
                Err(err)
            }
        }
    }

    /// Clear the draft and the evidence collection (previews released)
    pub fn reset(&mut self) {
        self.draft = IncidentReport::default();
        self.evidence.clear();
        self.lookup_failed = false;
    }
}
