//! JSON-RPC envelope shared by the HTTP and stdio transports.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Deserialize, Debug)]
pub struct RpcReq {
    pub jsonrpc: String,
    /// Null for notifications, which receive no response.
    #[serde(default)]
    pub id: J,
    pub method: String,
    #[serde(default)]
    pub params: J,
}

impl RpcReq {
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcResp {
    pub jsonrpc: &'static str,
    pub id: J,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: "2.0", id, result: Some(result), error: None }
}

pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp { jsonrpc: "2.0", id, result: None, error: Some(RpcErr { code, message: msg.into(), data }) }
}

/// A frame that never parsed has no id to echo; respond at the protocol's
/// null id with the standard parse-error code.
pub fn parse_error(msg: impl Into<String>) -> RpcResp {
    err(J::Null, -32700, msg, None)
}

/// Identity advertised in `initialize` and the self-description resource.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_parses_a_request_with_id() {
        let r: RpcReq =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(r.method, "tools/list");
        assert!(!r.is_notification());
        assert!(r.params.is_null());
    }

    #[test]
    fn it_treats_missing_id_as_notification() {
        let r: RpcReq = serde_json::from_str(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized","params":{}}"#,
        )
        .unwrap();
        assert!(r.is_notification());
    }

    #[test]
    fn it_serializes_ok_without_error_field() {
        let s = serde_json::to_string(&ok(json!(1), json!({"x": 1}))).unwrap();
        assert!(s.contains("\"result\""));
        assert!(!s.contains("\"error\""));
    }

    #[test]
    fn it_serializes_err_without_result_field() {
        let s = serde_json::to_string(&err(json!(1), -32601, "unknown method: nope", None)).unwrap();
        assert!(s.contains("-32601"));
        assert!(!s.contains("\"result\""));
    }

    #[test]
    fn parse_error_uses_the_null_id_and_standard_code() {
        let resp = parse_error("bad json");
        assert!(resp.id.is_null());
        let e = resp.error.unwrap();
        assert_eq!(e.code, -32700);
        assert!(e.message.contains("bad json"));
    }
}
