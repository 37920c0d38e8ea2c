//! Weakly typed host payloads

use crate::error::HostError;

/// A value crossing the host boundary
///
/// `Null` doubles as the "undefined" sentinel for absent results.
pub type HostValue = serde_json::Value;

/// Read a numeric field, treating missing or non-numeric fields as absent
///
/// Host numbers may arrive as floats; they are truncated toward zero the way a
/// host integer conversion would.
pub fn number_field(value: &HostValue, field: &str) -> Option<i64> {
    let n = value.get(field)?;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Whether a positional host argument carries something other than null
pub fn is_present(value: &HostValue) -> bool {
    !value.is_null()
}

/// Read an error-valued field; null or missing means no error
pub fn error_field(value: &HostValue, field: &str) -> Option<HostError> {
    value
        .get(field)
        .filter(|v| is_present(v))
        .map(HostError::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_field() {
        let v = json!({ "pid": 42, "exitCode": 7.0, "name": "x", "nan": null });
        assert_eq!(number_field(&v, "pid"), Some(42));
        assert_eq!(number_field(&v, "exitCode"), Some(7));
        assert_eq!(number_field(&v, "name"), None);
        assert_eq!(number_field(&v, "nan"), None);
        assert_eq!(number_field(&v, "missing"), None);
    }

    #[test]
    fn test_number_field_on_non_object() {
        assert_eq!(number_field(&HostValue::Null, "pid"), None);
        assert_eq!(number_field(&json!([1, 2]), "pid"), None);
    }

    #[test]
    fn test_error_field() {
        assert!(error_field(&json!({ "pid": 1 }), "error").is_none());
        assert!(error_field(&json!({ "error": null }), "error").is_none());

        let err = error_field(&json!({ "error": { "message": "boom" } }), "error")
            .expect("error should decode");
        assert_eq!(err.message, "boom");
    }
}
