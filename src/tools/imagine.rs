use serde_json::json;

use crate::clients::imagine::ImagineRemote;
use crate::core::content::ToolOutput;
use crate::domain::{DomainError, Tool};

const DEFAULT_SIZE: &str = "512x512";

/// Text-to-image via the remote renderer. The credential is injected at
/// construction; a missing key surfaces as a domain failure at call time.
pub struct ImagineTool {
    client: ImagineRemote,
}

impl ImagineTool {
    pub fn new(client: ImagineRemote) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ImagineTool {
    fn name(&self) -> &'static str {
        "imagine"
    }

    fn description(&self) -> &'static str {
        "Generate an image from a text prompt"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string", "description": "What to draw" },
                "size": {
                    "type": "string",
                    "enum": ["256x256", "512x512", "1024x1024"],
                    "description": "Output dimensions (default 512x512)"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, DomainError> {
        let prompt = arguments
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::msg("missing required field: prompt"))?;
        let size = arguments
            .get("size")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_SIZE);

        let image = self.client.generate(prompt, size).await.map_err(DomainError::Message)?;

        Ok(ToolOutput::image(&image.bytes, image.mime_type)
            .with_meta(json!({ "audience": ["user"], "priority": 0.9 })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::ToolConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

    #[tokio::test]
    async fn it_wraps_renderer_output_in_an_image_block() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/images");
            then.status(200).header("content-type", "image/png").body(PNG_MAGIC);
        });

        let tool = ImagineTool::new(ImagineRemote::new(server.base_url(), "k"));
        let out = tool.call(&json!({"prompt": "a lighthouse at dusk"})).await.unwrap();

        let v = serde_json::to_value(&out.content[0]).unwrap();
        assert_eq!(v["type"], "image");
        assert_eq!(v["mimeType"], "image/png");
        assert_eq!(out.meta.unwrap()["audience"][0], "user");
    }

    #[tokio::test]
    async fn a_missing_credential_is_a_domain_failure() {
        let tool = ImagineTool::new(ImagineRemote::from_config(&ToolConfig {
            base_url: Some("http://localhost:9".into()),
            ..Default::default()
        }));
        let err = tool.call(&json!({"prompt": "anything"})).await.unwrap_err();
        assert!(err.to_string().contains("IMAGINE_API_KEY"));
    }

    #[tokio::test]
    async fn an_upstream_failure_is_reported_in_its_own_words() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/images");
            then.status(400).body("bad");
        });
        let tool = ImagineTool::new(ImagineRemote::new(server.base_url(), "k"));
        let err = tool.call(&json!({"prompt": "x"})).await.unwrap_err();
        assert!(err.to_string().contains("upstream status"));
    }
}
