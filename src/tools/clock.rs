use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::json;

use crate::core::content::ToolOutput;
use crate::domain::{DomainError, Tool};

const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Clone, Default)]
pub struct ClockTool;

fn render(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

#[async_trait::async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &'static str {
        "time"
    }

    fn description(&self) -> &'static str {
        "Current time in an IANA timezone (default UTC)"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "IANA zone identifier, e.g. Europe/Dublin"
                }
            },
            "required": []
        })
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, DomainError> {
        let zone = arguments
            .get("timezone")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_TIMEZONE);

        let tz: Tz = zone
            .parse()
            .map_err(|_| DomainError::Message(format!("invalid timezone identifier: \"{zone}\"")))?;

        Ok(ToolOutput::text(render(Utc::now(), tz)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[tokio::test]
    async fn it_defaults_to_utc() {
        let out = ClockTool.call(&json!({})).await.unwrap();
        assert!(out.content[0].as_text().unwrap().ends_with("UTC"));
    }

    #[tokio::test]
    async fn an_unknown_zone_is_named_in_the_failure() {
        let err = ClockTool.call(&json!({"timezone": "Not/AZone"})).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid timezone identifier: \"Not/AZone\"");
    }

    #[test]
    fn rendering_applies_the_zone_offset() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let rendered = render(now, chrono_tz::Asia::Seoul);
        assert_eq!(rendered, "2024-06-01 21:00:00 KST");
    }

    #[tokio::test]
    async fn a_valid_zone_produces_a_single_text_block() {
        let out = ClockTool.call(&json!({"timezone": "Asia/Seoul"})).await.unwrap();
        assert_eq!(out.content.len(), 1);
        assert!(out.content[0].as_text().unwrap().ends_with("KST"));
    }
}
