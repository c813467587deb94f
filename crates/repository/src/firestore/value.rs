//! Conversion between Firestore typed values and plain JSON
//!
//! The REST API wraps every value in a single-key object naming its type,
//! e.g. `{"stringValue": "Carlton"}` or `{"integerValue": "5"}`.

use serde_json::{json, Map, Number, Value};

/// Turn a typed value into plain JSON.
///
/// Geo points become `{"latitude", "longitude"}` objects, timestamps,
/// references and bytes become strings, and unknown shapes become `null`.
pub fn decode(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.as_bool().map_or(Value::Null, Value::Bool),
        "integerValue" => decode_integer(inner),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        "geoPointValue" => json!({
            "latitude": inner.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
            "longitude": inner.get("longitude").and_then(Value::as_f64).unwrap_or(0.0),
        }),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => inner
            .get("fields")
            .and_then(Value::as_object)
            .map_or_else(|| Value::Object(Map::new()), decode_fields),
        _ => Value::Null,
    }
}

/// Decode a document's `fields` map into a plain JSON object.
pub fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode(value)))
            .collect(),
    )
}

/// int64 travels as a decimal string
fn decode_integer(inner: &Value) -> Value {
    match inner {
        Value::String(s) => s.parse::<i64>().map_or(Value::Null, |n| Value::Number(n.into())),
        Value::Number(n) => Value::Number(n.clone()),
        _ => Value::Null,
    }
}

/// Turn plain JSON into a typed value.
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a plain JSON object as a `fields` map.
pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode(&json!({"stringValue": "Carlton"})), json!("Carlton"));
        assert_eq!(decode(&json!({"integerValue": "5"})), json!(5));
        assert_eq!(decode(&json!({"doubleValue": -37.81})), json!(-37.81));
        assert_eq!(decode(&json!({"booleanValue": true})), json!(true));
        assert_eq!(decode(&json!({"nullValue": null})), Value::Null);
        assert_eq!(
            decode(&json!({"timestampValue": "2025-03-01T10:00:00Z"})),
            json!("2025-03-01T10:00:00Z")
        );
    }

    #[test]
    fn test_decode_bad_integer() {
        assert_eq!(decode(&json!({"integerValue": "five"})), Value::Null);
        assert_eq!(decode(&json!({"mysteryValue": 1})), Value::Null);
        assert_eq!(decode(&json!("bare")), Value::Null);
    }

    #[test]
    fn test_decode_geo_point_fills_omitted_zero() {
        let decoded = decode(&json!({"geoPointValue": {"latitude": -37.81}}));
        assert_eq!(decoded, json!({"latitude": -37.81, "longitude": 0.0}));
    }

    #[test]
    fn test_decode_nested_document() {
        let fields = json!({
            "title": {"stringValue": "Rooftop"},
            "reviews": {"arrayValue": {"values": [
                {"mapValue": {"fields": {
                    "reviewer": {"stringValue": "maya"},
                    "rating": {"integerValue": "4"},
                    "comment": {"stringValue": "Great view"}
                }}}
            ]}},
            "tags": {"arrayValue": {}},
            "meta": {"mapValue": {}},
        });

        let decoded = decode_fields(fields.as_object().unwrap());
        assert_eq!(decoded["title"], "Rooftop");
        assert_eq!(decoded["reviews"][0]["rating"], 4);
        assert_eq!(decoded["tags"], json!([]));
        assert_eq!(decoded["meta"], json!({}));
    }

    #[test]
    fn test_encode() {
        let plain = json!({
            "title": "Lantern",
            "rating": 5,
            "latitude": -37.82,
            "isUserSubmitted": true,
            "reviews": [],
            "image": null,
        });
        let fields = encode_fields(plain.as_object().unwrap());

        assert_eq!(fields["title"], json!({"stringValue": "Lantern"}));
        assert_eq!(fields["rating"], json!({"integerValue": "5"}));
        assert_eq!(fields["latitude"], json!({"doubleValue": -37.82}));
        assert_eq!(fields["isUserSubmitted"], json!({"booleanValue": true}));
        assert_eq!(fields["reviews"], json!({"arrayValue": {"values": []}}));
        assert_eq!(fields["image"], json!({"nullValue": null}));
    }

    #[test]
    fn test_encoded_document_decodes_to_itself() {
        let plain = json!({"name": "x", "nested": {"n": 1, "list": [1.5, "a", false]}});
        let encoded = encode_fields(plain.as_object().unwrap());
        assert_eq!(decode_fields(&encoded), plain);
    }
}
