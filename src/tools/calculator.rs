use serde_json::json;

use crate::core::content::ToolOutput;
use crate::domain::{DomainError, Tool};

#[derive(Clone, Default)]
pub struct CalculatorTool;

/// Integral results print without a fractional suffix: `6 * 7 = 42`,
/// not `42.0`.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[async_trait::async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn description(&self) -> &'static str {
        "Apply a basic arithmetic operator to two numbers"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "num1": { "type": "number" },
                "num2": { "type": "number" },
                "operator": { "type": "string", "enum": ["+", "-", "*", "/"] }
            },
            "required": ["num1", "num2", "operator"]
        })
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, DomainError> {
        let num1 = arguments
            .get("num1")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DomainError::msg("missing required field: num1"))?;
        let num2 = arguments
            .get("num2")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DomainError::msg("missing required field: num2"))?;
        let operator = arguments
            .get("operator")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::msg("missing required field: operator"))?;

        let result = match operator {
            "+" => num1 + num2,
            "-" => num1 - num2,
            "*" => num1 * num2,
            "/" => {
                if num2 == 0.0 {
                    return Err(DomainError::Message(format!(
                        "division by zero: {} / 0 is undefined",
                        format_number(num1)
                    )));
                }
                num1 / num2
            }
            other => return Err(DomainError::Message(format!("unsupported operator: {other}"))),
        };

        Ok(ToolOutput::text(format!(
            "{} {} {} = {}",
            format_number(num1),
            operator,
            format_number(num2),
            format_number(result)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn run(num1: f64, num2: f64, operator: &str) -> Result<ToolOutput, DomainError> {
        CalculatorTool
            .call(&json!({"num1": num1, "num2": num2, "operator": operator}))
            .await
    }

    #[tokio::test]
    async fn multiplication_prints_an_integral_result() {
        let out = run(6.0, 7.0, "*").await.unwrap();
        assert_eq!(out.content[0].as_text(), Some("6 * 7 = 42"));
    }

    #[tokio::test]
    async fn division_by_zero_is_a_domain_failure() {
        let err = run(10.0, 0.0, "/").await.unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }

    #[tokio::test]
    async fn fractional_results_keep_their_fraction() {
        let out = run(1.0, 8.0, "/").await.unwrap();
        assert_eq!(out.content[0].as_text(), Some("1 / 8 = 0.125"));
    }

    #[tokio::test]
    async fn negative_operands_are_ordinary_input() {
        let out = run(-2.5, 1.5, "+").await.unwrap();
        assert_eq!(out.content[0].as_text(), Some("-2.5 + 1.5 = -1"));
    }

    #[test]
    fn number_formatting_edges() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(-7.0), "-7");
    }
}
