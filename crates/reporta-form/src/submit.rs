//! Report submission client
//!
//! Encodes the finished report as a multipart request (text fields plus one
//! `evidencias` part per attachment) and posts it to the backend. The wire
//! field names are the backend's contract and must not be renamed here.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use reporta_core::{Attachment, FormConfig, IncidentReport};

/// Backend acknowledgement for a submitted report
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReceipt {
    pub message: Option<String>,
    #[serde(rename = "numero_registro")]
    pub registration_number: Option<String>,
}

/// Seam for the report backend
#[async_trait]
pub trait SubmitBackend: Send + Sync {
    /// Persist the report and its evidence; returns the backend receipt
    async fn submit(
        &self,
        draft: &IncidentReport,
        evidence: &[Attachment],
    ) -> Result<SubmitReceipt>;
}

/// HTTP multipart submitter for the report API
pub struct ReportSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl ReportSubmitter {
    pub fn new(config: &FormConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.report_api_url.clone(),
        })
    }

    fn build_form(draft: &IncidentReport, evidence: &[Attachment]) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new()
            .text("tipo_documento", draft.document_kind.wire_label())
            .text("numero_documento", draft.document_number.clone())
            .text("nombre_completo", draft.full_name.clone())
            .text("correo_institucional", draft.institutional_email.clone())
            .text("nombre_reportante", draft.reporter_name.clone())
            .text("area_texto", draft.area.clone())
            .text(
                "tipo_reporte",
                draft
                    .report_kind
                    .map(|k| k.wire_label().to_string())
                    .unwrap_or_default(),
            )
            .text(
                "relacionado_con",
                draft
                    .related_category
                    .map(|c| c.wire_label().to_string())
                    .unwrap_or_default(),
            )
            .text("lugar_incidente", draft.location.clone())
            .text(
                "fecha_incidente",
                draft
                    .occurred_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default(),
            )
            .text("descripcion_observacion", draft.observation.clone());

        for attachment in evidence {
            let part = reqwest::multipart::Part::bytes(attachment.content.to_vec())
                .file_name(attachment.original_name.clone())
                .mime_str(&attachment.content_type)
                .with_context(|| {
                    format!("Invalid content type: {}", attachment.content_type)
                })?;
            form = form.part("evidencias", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl SubmitBackend for ReportSubmitter {
    async fn submit(
        &self,
        draft: &IncidentReport,
        evidence: &[Attachment],
    ) -> Result<SubmitReceipt> {
        let form = Self::build_form(draft, evidence)?;

        tracing::info!(
            evidence_count = evidence.len(),
            endpoint = %self.endpoint,
            "Submitting incident report"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("Failed to send report")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| format!("Server error: {}", status));
            return Err(anyhow::anyhow!(message));
        }

        let receipt: SubmitReceipt = response
            .json()
            .await
            .context("Failed to parse submission response")?;

        tracing::info!(
            registration_number = ?receipt.registration_number,
            "Report accepted by backend"
        );
        Ok(receipt)
    }
}
