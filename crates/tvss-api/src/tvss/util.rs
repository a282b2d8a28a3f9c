//! TVSS helper functions.

use chrono::Local;
use serde_json::Value;

use super::types::{Document, ZipCallsignsResponse};

/// Date format used in day-schedule URLs.
pub const DATESTRING_FORMAT: &str = "%Y%m%d";

/// Returns today's date (local time) as `YYYYMMDD`.
#[must_use]
pub fn today_datestring() -> String {
    Local::now().format(DATESTRING_FORMAT).to_string()
}

/// Collects callsigns from stations whose confidence is at least `min_confidence`.
///
/// Stations without a confidence value or link list are skipped. Output
/// follows the upstream item and link order; duplicates are kept.
#[must_use]
pub fn extract_callsigns(response: &ZipCallsignsResponse, min_confidence: u32) -> Vec<String> {
    let threshold = f64::from(min_confidence);
    response
        .items
        .iter()
        .flatten()
        .filter(|station| station.confidence.is_some_and(|c| c >= threshold))
        .filter_map(|station| station.links.as_ref())
        .flatten()
        .filter_map(|link| link.callsign.clone())
        .collect()
}

/// Merges `fields` into a JSON object.
///
/// Returns `None` when `value` is not an object (including `null`).
pub(crate) fn annotate(value: Value, fields: &[(&str, &str)]) -> Option<Document> {
    let Value::Object(mut document) = value else {
        return None;
    };
    for (key, field_value) in fields {
        document.insert(String::from(*key), Value::String(String::from(*field_value)));
    }
    Some(document)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn zip_response(value: &Value) -> ZipCallsignsResponse {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn test_extract_callsigns_threshold_is_inclusive() {
        // Arrange
        let response = zip_response(&json!({
            "$items": [
                {"confidence": 30, "$links": [{"callsign": "KABC"}]},
                {"confidence": 60, "$links": [{"callsign": "KQED"}]},
                {"confidence": 50, "$links": [{"callsign": "KQEH"}]}
            ]
        }));

        // Act
        let callsigns = extract_callsigns(&response, 50);

        // Assert
        assert_eq!(callsigns, vec!["KQED", "KQEH"]);
    }

    #[test]
    fn test_extract_callsigns_zero_threshold_skips_missing_confidence() {
        // Arrange
        let response = zip_response(&json!({
            "$items": [
                {"$links": [{"callsign": "KNOC"}]},
                {"confidence": null, "$links": [{"callsign": "KNUL"}]},
                {"confidence": 0, "$links": [{"callsign": "KZRO"}]},
                {"confidence": 95, "$links": [{"callsign": "KQED"}]}
            ]
        }));

        // Act
        let callsigns = extract_callsigns(&response, 0);

        // Assert
        assert_eq!(callsigns, vec!["KZRO", "KQED"]);
    }

    #[test]
    fn test_extract_callsigns_flattens_links_and_keeps_duplicates() {
        // Arrange
        let response = zip_response(&json!({
            "$items": [
                null,
                {"confidence": 100, "$links": [
                    {"callsign": "KQED"},
                    {"callsign": "KQEH"},
                    {"rel": "self"}
                ]},
                {"confidence": 80},
                {"confidence": 70, "$links": [{"callsign": "KQED"}]}
            ]
        }));

        // Act
        let callsigns = extract_callsigns(&response, 1);

        // Assert
        assert_eq!(callsigns, vec!["KQED", "KQEH", "KQED"]);
    }

    #[test]
    fn test_extract_callsigns_skips_null_links() {
        // Arrange
        let response = zip_response(&json!({
            "$items": [
                {"confidence": 60, "$links": null},
                {"confidence": 70, "$links": [{"callsign": "KQED"}]}
            ]
        }));

        // Act
        let callsigns = extract_callsigns(&response, 0);

        // Assert
        assert_eq!(callsigns, vec!["KQED"]);
    }

    #[test]
    fn test_extract_callsigns_fractional_confidence() {
        // Arrange
        let response = zip_response(&json!({
            "$items": [
                {"confidence": 49.5, "$links": [{"callsign": "KRCB"}]},
                {"confidence": 50.0, "$links": [{"callsign": "KCSM"}]}
            ]
        }));

        // Act
        let callsigns = extract_callsigns(&response, 50);

        // Assert
        assert_eq!(callsigns, vec!["KCSM"]);
    }

    #[test]
    fn test_today_datestring_shape() {
        // Arrange & Act
        let today = today_datestring();

        // Assert
        assert_eq!(today.len(), 8);
        assert!(today.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_annotate_object() {
        // Arrange
        let value = json!({"feeds": []});

        // Act
        let document = annotate(value, &[("callsign", "kqed"), ("datestring", "20240101")]).unwrap();

        // Assert
        assert_eq!(document["callsign"], "kqed");
        assert_eq!(document["datestring"], "20240101");
        assert_eq!(document["feeds"], json!([]));
    }

    #[test]
    fn test_annotate_overwrites_upstream_field() {
        // Arrange
        let value = json!({"callsign": "KQED"});

        // Act
        let document = annotate(value, &[("callsign", "kqed")]).unwrap();

        // Assert
        assert_eq!(document["callsign"], "kqed");
    }

    #[test]
    fn test_annotate_rejects_non_objects() {
        // Arrange & Act & Assert
        assert!(annotate(Value::Null, &[("callsign", "kqed")]).is_none());
        assert!(annotate(json!([1, 2]), &[("callsign", "kqed")]).is_none());
        assert!(annotate(json!(false), &[("callsign", "kqed")]).is_none());
    }

    #[test]
    fn test_annotate_empty_object_is_valid() {
        // Arrange & Act
        let document = annotate(json!({}), &[("callsign", "kqed")]).unwrap();

        // Assert
        assert_eq!(document.len(), 1);
    }
}
