use reqwest::Client;
use serde::Serialize;
use std::time::Instant;

use crate::infra::config::ToolConfig;
use crate::infra::http::headers::{add_standard_headers, generate_request_id};
use crate::infra::runtime::limits::{make_http_client, make_http_client_with, retry_async};

/// Already-encoded image bytes plus the MIME type the renderer reported.
/// No transcoding happens downstream; this pair is what reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Clone)]
pub struct ImagineRemote {
    base: Option<String>,
    api_key: Option<String>,
    http: Client,
    retries: u32,
}

impl ImagineRemote {
    pub fn new(base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            api_key: Some(api_key.into()),
            http: make_http_client(),
            retries: 2,
        }
    }

    pub fn from_config(cfg: &ToolConfig) -> Self {
        Self {
            base: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            http: make_http_client_with(cfg),
            retries: cfg.retries.unwrap_or(2),
        }
    }

    pub async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage, String> {
        let base = self
            .base
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or("IMAGINE_BASE_URL is not configured; set it to enable the imagine tool")?;
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or("IMAGINE_API_KEY is not configured; set it to enable the imagine tool")?
            .to_owned();

        let url = format!("{}/v1/images", base.trim_end_matches('/'));
        let http = self.http.clone();
        tracing::debug!(endpoint = %url, size = size, "imagine.generate request");
        let req_id = generate_request_id();
        let start = Instant::now();
        let attempts = self.retries;
        let res: Result<GeneratedImage, String> = retry_async(attempts, move |_| {
            let http = http.clone();
            let url = url.clone();
            let key = key.clone();
            let req_id = req_id.clone();
            let payload = RenderReq { prompt, size };
            async move {
                let (builder, _rid) = add_standard_headers(http.post(url), Some(req_id));
                let resp = builder
                    .bearer_auth(key)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                if !resp.status().is_success() {
                    if resp.status().is_server_error() {
                        return Err(format!("retryable status {}", resp.status()));
                    }
                    return Err(format!("upstream status {}", resp.status()));
                }
                let mime_type = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("image/png")
                    .to_owned();
                let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
                Ok(GeneratedImage { bytes: bytes.to_vec(), mime_type })
            }
        })
        .await;
        if res.is_err() {
            crate::infra::logging::log_metric("imagine", "remote_error_total", 1.0);
        }
        let image = res?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("imagine", "remote_latency_ms", elapsed_ms);
        Ok(image)
    }
}

#[derive(Serialize)]
struct RenderReq<'a> {
    prompt: &'a str,
    size: &'a str,
}
