//! Report draft validation
//!
//! Field-level rules are declared on [`IncidentReport`] itself; this module
//! adds the cross-field rules that depend on other fields or on configuration:
//! the document-number format per document kind and the institutional e-mail
//! domain.

use std::sync::OnceLock;

use regex::Regex;
use reporta_core::{DocumentKind, FormConfig, IncidentReport};
use validator::Validate;

fn dni_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8}$").expect("static DNI pattern"))
}

/// True once the number is a complete DNI (8 numeric digits); used both for
/// validation and to decide when to fire the identity lookup.
pub fn is_complete_dni(number: &str) -> bool {
    dni_pattern().is_match(number)
}

/// Validate the document number against its kind's format
pub fn validate_document_number(kind: DocumentKind, number: &str) -> Result<(), String> {
    match kind {
        DocumentKind::Dni => {
            if is_complete_dni(number) {
                Ok(())
            } else {
                Err("The DNI must be exactly 8 numeric digits".to_string())
            }
        }
        _ => {
            if number.trim().is_empty() {
                Err("Document number is required".to_string())
            } else {
                Ok(())
            }
        }
    }
}

/// Validate that the e-mail belongs to the institutional domain
pub fn validate_institutional_email(email: &str, domain: &str) -> Result<(), String> {
    if email.to_lowercase().ends_with(&domain.to_lowercase()) {
        Ok(())
    } else {
        Err(format!("E-mail must end with {}", domain))
    }
}

/// Validate the whole draft: derive-level field rules plus the cross-field
/// rules above. Collects every violation so the form can show them all.
pub fn validate_draft(draft: &IncidentReport, config: &FormConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(field_errors) = draft.validate() {
        for (field, violations) in field_errors.field_errors() {
            for violation in violations {
                let message = violation
                    .message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                errors.push(message);
            }
        }
    }

    if let Err(message) = validate_document_number(draft.document_kind, &draft.document_number) {
        errors.push(message);
    }
    if let Err(message) =
        validate_institutional_email(&draft.institutional_email, &config.email_domain)
    {
        errors.push(message);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reporta_core::{RelatedCategory, ReportKind};

    fn filled_draft() -> IncidentReport {
        IncidentReport {
            document_kind: DocumentKind::Dni,
            document_number: "12345678".to_string(),
            full_name: "Ana Quispe".to_string(),
            institutional_email: "ana.quispe@senati.pe".to_string(),
            reporter_name: "Ana Quispe".to_string(),
            area: "Área de Producción".to_string(),
            report_kind: Some(ReportKind::UnsafeAct),
            related_category: Some(RelatedCategory::Tools),
            location: "Taller 2".to_string(),
            occurred_at: Some(Utc::now()),
            observation: "Grinder used without eye protection".to_string(),
        }
    }

    #[test]
    fn test_complete_dni() {
        assert!(is_complete_dni("12345678"));
        assert!(!is_complete_dni("1234567"));
        assert!(!is_complete_dni("123456789"));
        assert!(!is_complete_dni("1234567a"));
        assert!(!is_complete_dni(""));
    }

    #[test]
    fn test_document_number_rules_per_kind() {
        assert!(validate_document_number(DocumentKind::Dni, "12345678").is_ok());
        assert!(validate_document_number(DocumentKind::Dni, "12-45678").is_err());
        assert!(validate_document_number(DocumentKind::Passport, "PA1234567").is_ok());
        assert!(validate_document_number(DocumentKind::Passport, "").is_err());
        assert!(validate_document_number(DocumentKind::Other, "  ").is_err());
    }

    #[test]
    fn test_institutional_email_domain() {
        assert!(validate_institutional_email("ana@senati.pe", "@senati.pe").is_ok());
        assert!(validate_institutional_email("ANA@SENATI.PE", "@senati.pe").is_ok());
        assert!(validate_institutional_email("ana@gmail.com", "@senati.pe").is_err());
    }

    #[test]
    fn test_validate_draft_ok() {
        assert!(validate_draft(&filled_draft(), &FormConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_draft_collects_all_violations() {
        let mut draft = filled_draft();
        draft.document_number = "12".to_string();
        draft.institutional_email = "ana@gmail.com".to_string();
        draft.observation = "short".to_string();

        let errors = validate_draft(&draft, &FormConfig::default()).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("8 numeric digits")));
        assert!(errors.iter().any(|e| e.contains("must end with")));
        assert!(errors.iter().any(|e| e.contains("at least 10 characters")));
    }

    #[test]
    fn test_validate_draft_foreign_document_skips_dni_format() {
        let mut draft = filled_draft();
        draft.document_kind = DocumentKind::ForeignerCard;
        draft.document_number = "CE-004211".to_string();
        assert!(validate_draft(&draft, &FormConfig::default()).is_ok());
    }
}
