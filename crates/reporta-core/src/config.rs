//! Configuration module
//!
//! This module provides configuration structures for the evidence subsystem,
//! the camera capture pipeline, and the surrounding form, with env-var
//! overrides on top of the shipped defaults.

use std::env;
use std::time::Duration;

use anyhow::Context;

// Common constants
const MAX_FILES: usize = 3;
const MAX_UPLOAD_SIZE_MB: usize = 5;
const MAX_CAPTURE_SIZE_MB: usize = 10;
const ACQUIRE_GRACE_SECS: u64 = 3;
const IDEAL_FRAME_WIDTH: u32 = 1280;
const IDEAL_FRAME_HEIGHT: u32 = 720;
const CAPTURE_JPEG_QUALITY: u8 = 80;
const MIN_OBSERVATION_CHARS: usize = 10;

/// Limits applied when admitting evidence into a report
#[derive(Clone, Debug)]
pub struct EvidencePolicy {
    /// Maximum number of attachments per report
    pub max_files: usize,
    /// Size ceiling for files picked from disk
    pub max_upload_bytes: usize,
    /// Size ceiling for camera captures (larger than uploads)
    pub max_capture_bytes: usize,
    /// Content types accepted for uploads; captures are always JPEG
    pub accepted_upload_types: Vec<String>,
}

impl Default for EvidencePolicy {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_upload_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            max_capture_bytes: MAX_CAPTURE_SIZE_MB * 1024 * 1024,
            accepted_upload_types: [
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/gif",
                "image/bmp",
                "image/heic",
                "application/pdf",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl EvidencePolicy {
    /// Check a content type against the accepted upload set (case-insensitive)
    pub fn accepts_upload_type(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        self.accepted_upload_types.iter().any(|ct| ct == &normalized)
    }

    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_bytes / (1024 * 1024)
    }

    pub fn max_capture_mb(&self) -> usize {
        self.max_capture_bytes / (1024 * 1024)
    }
}

/// Camera capture configuration
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Preferred stream resolution; the platform may substitute
    pub ideal_width: u32,
    pub ideal_height: u32,
    /// JPEG quality (0-100) for encoded captures
    pub jpeg_quality: u8,
    /// Bounded wait for device acquisition before optimistically proceeding
    pub acquire_grace: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: IDEAL_FRAME_WIDTH,
            ideal_height: IDEAL_FRAME_HEIGHT,
            jpeg_quality: CAPTURE_JPEG_QUALITY,
            acquire_grace: Duration::from_secs(ACQUIRE_GRACE_SECS),
        }
    }
}

/// Surrounding-form configuration (endpoints and field rules)
#[derive(Clone, Debug)]
pub struct FormConfig {
    /// Report submission endpoint (multipart POST)
    pub report_api_url: String,
    /// Identity (DNI) lookup endpoint; the document number is appended
    pub lookup_api_url: String,
    /// Bearer token for the lookup API
    pub lookup_api_token: Option<String>,
    /// Required domain suffix for the institutional e-mail field
    pub email_domain: String,
    /// Minimum length of the observation field
    pub min_observation_chars: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            report_api_url: "http://localhost:3000/api/reportes".to_string(),
            lookup_api_url: "https://api.factiliza.com/v1/dni/info".to_string(),
            lookup_api_token: None,
            email_domain: "@senati.pe".to_string(),
            min_observation_chars: MIN_OBSERVATION_CHARS,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub evidence: EvidencePolicy,
    pub camera: CameraConfig,
    pub form: FormConfig,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    /// Reads a `.env` file first when one is present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = EvidencePolicy::default();

        let evidence = EvidencePolicy {
            max_files: env::var("MAX_FILES")
                .unwrap_or_else(|_| MAX_FILES.to_string())
                .parse()
                .context("Invalid MAX_FILES")?,
            max_upload_bytes: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
                .parse::<usize>()
                .context("Invalid MAX_UPLOAD_SIZE_MB")?
                * 1024
                * 1024,
            max_capture_bytes: env::var("MAX_CAPTURE_SIZE_MB")
                .unwrap_or_else(|_| MAX_CAPTURE_SIZE_MB.to_string())
                .parse::<usize>()
                .context("Invalid MAX_CAPTURE_SIZE_MB")?
                * 1024
                * 1024,
            accepted_upload_types: match env::var("ACCEPTED_UPLOAD_TYPES") {
                Ok(list) => list
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(_) => defaults.accepted_upload_types,
            },
        };

        let camera = CameraConfig {
            acquire_grace: Duration::from_secs(
                env::var("CAMERA_ACQUIRE_GRACE_SECS")
                    .unwrap_or_else(|_| ACQUIRE_GRACE_SECS.to_string())
                    .parse()
                    .context("Invalid CAMERA_ACQUIRE_GRACE_SECS")?,
            ),
            ..CameraConfig::default()
        };

        let form = FormConfig {
            report_api_url: env::var("REPORT_API_URL")
                .unwrap_or_else(|_| FormConfig::default().report_api_url),
            lookup_api_url: env::var("DNI_API_URL")
                .unwrap_or_else(|_| FormConfig::default().lookup_api_url),
            lookup_api_token: env::var("DNI_API_TOKEN").ok(),
            email_domain: env::var("INSTITUTIONAL_EMAIL_DOMAIN")
                .unwrap_or_else(|_| FormConfig::default().email_domain),
            min_observation_chars: MIN_OBSERVATION_CHARS,
        };

        let config = Config {
            evidence,
            camera,
            form,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.evidence.max_files == 0 {
            anyhow::bail!("MAX_FILES must be at least 1");
        }
        if self.evidence.accepted_upload_types.is_empty() {
            anyhow::bail!("ACCEPTED_UPLOAD_TYPES must not be empty");
        }
        if !self.form.email_domain.starts_with('@') {
            anyhow::bail!("INSTITUTIONAL_EMAIL_DOMAIN must start with '@'");
        }
        Ok(())
    }
}
