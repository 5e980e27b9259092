//! Identity lookup client
//!
//! Resolves a national ID (DNI) number to the holder's full name through the
//! configured lookup API. Lookup failures are never fatal: the form lets the
//! user type the name manually.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use reporta_core::FormConfig;

/// Resolved identity data for a document number
#[derive(Debug, Clone)]
pub struct IdentityInfo {
    pub full_name: String,
}

/// Seam for the identity lookup service
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Resolve the holder of a national ID number
    async fn lookup(&self, document_number: &str) -> Result<IdentityInfo>;
}

/// Response shape of the DNI info API
#[derive(Debug, Deserialize)]
struct DniApiResponse {
    success: bool,
    message: Option<String>,
    data: Option<DniApiData>,
}

#[derive(Debug, Deserialize)]
struct DniApiData {
    nombre_completo: Option<String>,
}

/// HTTP client for the DNI info API (bearer-token auth)
pub struct DniClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DniClient {
    pub fn new(config: &FormConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.lookup_api_url.trim_end_matches('/').to_string(),
            token: config.lookup_api_token.clone(),
        })
    }
}

#[async_trait]
impl IdentityLookup for DniClient {
    async fn lookup(&self, document_number: &str) -> Result<IdentityInfo> {
        let url = format!("{}/{}", self.base_url, document_number);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send lookup request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Lookup request failed with status {}",
                status
            ));
        }

        let body: DniApiResponse = response
            .json()
            .await
            .context("Failed to parse lookup response")?;

        if !body.success {
            return Err(anyhow::anyhow!(body
                .message
                .unwrap_or_else(|| "Document not found".to_string())));
        }

        match body.data.and_then(|d| d.nombre_completo) {
            Some(full_name) if !full_name.trim().is_empty() => Ok(IdentityInfo { full_name }),
            _ => Err(anyhow::anyhow!("Lookup response carried no name")),
        }
    }
}
