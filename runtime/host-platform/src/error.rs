//! Host-reported errors
//!
//! Hosts report failures as loosely shaped values: a bare string, or an object
//! carrying `message`, a symbolic `code` such as `"ENOENT"` and sometimes a
//! numeric `errno`. [`HostError`] keeps all of it, including the raw value.

use serde_json::json;
use thiserror::Error;

use crate::value::HostValue;

/// An error value produced by the host runtime
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HostError {
    /// Human readable message
    pub message: String,

    /// Symbolic error code (`"ENOENT"`, `"ECHILD"`, ...)
    pub code: Option<String>,

    /// Numeric errno as reported by the host, sign preserved
    pub errno: Option<i64>,

    /// The raw host value the error was decoded from
    pub detail: HostValue,
}

impl HostError {
    /// Create an error with only a message
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: HostValue::String(message.clone()),
            message,
            code: None,
            errno: None,
        }
    }

    /// Attach a symbolic error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self.detail = self.to_value();
        self
    }

    /// Attach a numeric errno
    pub fn with_errno(mut self, errno: i64) -> Self {
        self.errno = Some(errno);
        self.detail = self.to_value();
        self
    }

    /// Decode an arbitrary host value into an error
    ///
    /// Never fails: unknown shapes fall back to their JSON rendering as the
    /// message, and the original value is kept in `detail`.
    pub fn from_value(value: &HostValue) -> Self {
        let (message, code, errno) = match value {
            HostValue::String(s) => (s.clone(), None, None),
            HostValue::Object(map) => {
                let code = map.get("code").and_then(HostValue::as_str).map(str::to_owned);
                let message = map
                    .get("message")
                    .and_then(HostValue::as_str)
                    .map(str::to_owned)
                    .or_else(|| code.clone())
                    .unwrap_or_else(|| value.to_string());
                let errno = crate::value::number_field(value, "errno");
                (message, code, errno)
            }
            other => (other.to_string(), None, None),
        };

        Self {
            message,
            code,
            errno,
            detail: value.clone(),
        }
    }

    /// Render the error the way a host would hand it to a callback
    pub fn to_value(&self) -> HostValue {
        let mut obj = json!({ "message": self.message });
        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(errno) = self.errno {
            obj["errno"] = json!(errno);
        }
        obj
    }
}
