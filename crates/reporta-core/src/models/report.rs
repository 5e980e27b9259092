use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity document kinds accepted by the form.
///
/// Wire labels are the backend's fixed Spanish vocabulary; the enum variants
/// carry the domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "DNI")]
    Dni,
    #[serde(rename = "Pasaporte")]
    Passport,
    #[serde(rename = "Carné de extranjería")]
    ForeignerCard,
    #[serde(rename = "Cédula de identidad")]
    IdentityCard,
    #[serde(rename = "Licencia de conducir")]
    DriverLicense,
    #[serde(rename = "Tarjeta consular")]
    ConsularCard,
    #[serde(rename = "NIE")]
    Nie,
    #[serde(rename = "Visa")]
    Visa,
    #[serde(rename = "Otro")]
    Other,
}

impl DocumentKind {
    pub fn wire_label(&self) -> &'static str {
        match self {
            DocumentKind::Dni => "DNI",
            DocumentKind::Passport => "Pasaporte",
            DocumentKind::ForeignerCard => "Carné de extranjería",
            DocumentKind::IdentityCard => "Cédula de identidad",
            DocumentKind::DriverLicense => "Licencia de conducir",
            DocumentKind::ConsularCard => "Tarjeta consular",
            DocumentKind::Nie => "NIE",
            DocumentKind::Visa => "Visa",
            DocumentKind::Other => "Otro",
        }
    }

    pub fn all() -> &'static [DocumentKind] {
        &[
            DocumentKind::Dni,
            DocumentKind::Passport,
            DocumentKind::ForeignerCard,
            DocumentKind::IdentityCard,
            DocumentKind::DriverLicense,
            DocumentKind::ConsularCard,
            DocumentKind::Nie,
            DocumentKind::Visa,
            DocumentKind::Other,
        ]
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

/// Incident classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    #[serde(rename = "Acto Inseguro")]
    UnsafeAct,
    #[serde(rename = "Condición Insegura")]
    UnsafeCondition,
    #[serde(rename = "Cuasi Accidente")]
    NearMiss,
    #[serde(rename = "Incidente")]
    Incident,
    #[serde(rename = "Accidente")]
    Accident,
}

impl ReportKind {
    pub fn wire_label(&self) -> &'static str {
        match self {
            ReportKind::UnsafeAct => "Acto Inseguro",
            ReportKind::UnsafeCondition => "Condición Insegura",
            ReportKind::NearMiss => "Cuasi Accidente",
            ReportKind::Incident => "Incidente",
            ReportKind::Accident => "Accidente",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

/// What the incident relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedCategory {
    #[serde(rename = "EPP")]
    Ppe,
    #[serde(rename = "Maquinaria")]
    Machinery,
    #[serde(rename = "Herramientas")]
    Tools,
    #[serde(rename = "Instalaciones")]
    Facilities,
    #[serde(rename = "Procedimientos")]
    Procedures,
    #[serde(rename = "Ergonomía")]
    Ergonomics,
    #[serde(rename = "Otros")]
    Other,
}

impl RelatedCategory {
    pub fn wire_label(&self) -> &'static str {
        match self {
            RelatedCategory::Ppe => "EPP",
            RelatedCategory::Machinery => "Maquinaria",
            RelatedCategory::Tools => "Herramientas",
            RelatedCategory::Facilities => "Instalaciones",
            RelatedCategory::Procedures => "Procedimientos",
            RelatedCategory::Ergonomics => "Ergonomía",
            RelatedCategory::Other => "Otros",
        }
    }
}

impl fmt::Display for RelatedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

/// An organizational area a report can be filed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
}

/// The fixed area catalog shown in the form select
pub fn default_areas() -> Vec<Area> {
    [
        ("1", "Área de Seguridad"),
        ("2", "Área de Mantenimiento"),
        ("3", "Área de Producción"),
        ("4", "Área Administrativa"),
        ("5", "Área de Calidad"),
    ]
    .iter()
    .map(|(id, name)| Area {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// The report draft as the user edits it.
///
/// Field-level rules live here; cross-field rules (document-number format per
/// kind, institutional e-mail domain) are applied by the form controller,
/// which also gates submission on the evidence collection being non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IncidentReport {
    pub document_kind: DocumentKind,
    pub document_number: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid e-mail address"))]
    pub institutional_email: String,
    #[validate(length(min = 1, message = "Reporter name is required"))]
    pub reporter_name: String,
    #[validate(length(min = 1, message = "Select an area"))]
    pub area: String,
    #[validate(required(message = "Select a report type"))]
    pub report_kind: Option<ReportKind>,
    #[validate(required(message = "Select a category"))]
    pub related_category: Option<RelatedCategory>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(required(message = "Date and time are required"))]
    pub occurred_at: Option<DateTime<Utc>>,
    #[validate(length(min = 10, message = "Observation must be at least 10 characters"))]
    pub observation: String,
}

impl Default for IncidentReport {
    fn default() -> Self {
        Self {
            document_kind: DocumentKind::Dni,
            document_number: String::new(),
            full_name: String::new(),
            institutional_email: String::new(),
            reporter_name: String::new(),
            area: String::new(),
            report_kind: None,
            related_category: None,
            location: String::new(),
            occurred_at: None,
            observation: String::new(),
        }
    }
}
