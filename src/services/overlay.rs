//! Client for the external template/image overlay pipeline.
//!
//! The pipeline takes a base template reference plus named text fields
//! (and an optional logo) and returns one derived asset URL. The
//! caller appends the URL to the product's template-image list;
//! results accumulate and are never overwritten.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    pub template_url: String,
    pub name_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverlayResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct OverlayClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl OverlayClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Submit the overlay job and return the derived asset URL.
    pub async fn transform(&self, request: &OverlayRequest) -> Result<String, AppError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| AppError::Upstream("overlay pipeline not configured".to_string()))?;

        let resp = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "overlay pipeline returned {}",
                resp.status()
            )));
        }

        let body: OverlayResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_pipeline_is_upstream_error() {
        let client = OverlayClient::new(None);
        let req = OverlayRequest {
            template_url: "https://cdn.example/template.png".to_string(),
            name_text: "Aisha".to_string(),
            contact_number: None,
            month: None,
            year: None,
            logo_image_url: None,
        };
        let err = client.transform(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn test_request_omits_empty_fields() {
        let req = OverlayRequest {
            template_url: "t".to_string(),
            name_text: "n".to_string(),
            contact_number: None,
            month: Some("June".to_string()),
            year: None,
            logo_image_url: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("contactNumber").is_none());
        assert_eq!(json["month"], "June");
    }
}
