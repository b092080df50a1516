//! Response normalization.
//!
//! Every Pet Friends response is reduced to a status code and a body that is
//! either parsed JSON or the raw text. A body that fails to parse is never an
//! error: plain-text confirmations and HTML error pages come back verbatim.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A response body that parsed as JSON, or the unparsed text when it did not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse `text` as JSON, falling back to the text itself.
    pub fn normalize(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                log::debug!("response body is not JSON ({e}), keeping raw text");
                ResponseBody::Text(text)
            }
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }

    /// Look up `key` when the body is a JSON object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(key))
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{value}"),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

/// Status code and normalized body of one API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn into_parts(self) -> (u16, ResponseBody) {
        (self.status, self.body)
    }
}
