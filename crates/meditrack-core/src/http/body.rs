//! Response body normalization.
//!
//! Infrastructure in front of the API (SPA hosts, proxies) answers some requests with
//! an HTML page. Those bodies are kept as raw text instead of being fed to the JSON
//! parser, so the caller sees "got HTML" rather than a parse error.

use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    /// Anything that is not JSON: HTML pages, plain-text errors, invalid UTF-8 (lossy).
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ResponseBody::Empty;
        }
        if trimmed.starts_with('<') {
            tracing::warn!("API returned HTML, avoiding JSON parse");
            return ResponseBody::Text(text.into_owned());
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => ResponseBody::Json(v),
            Err(_) => ResponseBody::Text(text.into_owned()),
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, ResponseBody::Text(t) if t.trim_start().starts_with('<'))
    }

    /// The JSON document, or a `Network` error describing what came back instead.
    pub fn json(&self) -> Result<&Value, ApiError> {
        match self {
            ResponseBody::Json(v) => Ok(v),
            ResponseBody::Empty => Err(ApiError::network("empty response body where JSON was expected")),
            body if body.is_html() => Err(ApiError::network(
                "API returned an HTML page instead of JSON; check base_url",
            )),
            ResponseBody::Text(t) => Err(ApiError::network(format!(
                "response is not JSON: {}",
                snippet(t)
            ))),
        }
    }
}

fn snippet(text: &str) -> String {
    const MAX: usize = 80;
    let t = text.trim();
    match t.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &t[..idx]),
        None => t.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_is_kept_raw() {
        let body = ResponseBody::from_bytes(b"  <!DOCTYPE html><html><body>404</body></html>");
        assert!(body.is_html());
        let err = body.json().unwrap_err();
        assert!(matches!(err, ApiError::Network(ref m) if m.contains("HTML")));
    }

    #[test]
    fn json_is_parsed() {
        let body = ResponseBody::from_bytes(br#"{"id": 3, "role": "admin"}"#);
        assert_eq!(body.json().unwrap(), &json!({"id": 3, "role": "admin"}));
    }

    #[test]
    fn invalid_json_falls_back_to_text() {
        let body = ResponseBody::from_bytes(b"Internal Server Error");
        assert_eq!(body, ResponseBody::Text("Internal Server Error".to_string()));
        assert!(!body.is_html());
        assert!(body.json().is_err());
    }

    #[test]
    fn blank_body_is_empty() {
        assert_eq!(ResponseBody::from_bytes(b""), ResponseBody::Empty);
        assert_eq!(ResponseBody::from_bytes(b" \n"), ResponseBody::Empty);
    }

    #[test]
    fn snippet_truncates_long_text() {
        let long = "x".repeat(200);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert_eq!(s.len(), 83);
    }
}
