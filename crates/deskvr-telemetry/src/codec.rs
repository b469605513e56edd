use crate::types::TelemetryFrame;
use crate::TelemetryError;
use glam::{DVec2, DVec3};
use serde_json::{Map, Value};

/// Decode one channel record into a frame.
///
/// Every field is optional. Missing or mistyped numbers read as `0.0`, a missing
/// `clicked` reads as `false`, and short arrays leave their tail at `0.0`. Only a
/// payload that is not a JSON object is an error.
pub fn decode(bytes: &[u8]) -> Result<TelemetryFrame, TelemetryError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| TelemetryError::Malformed(e.to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(TelemetryError::Malformed(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            )))
        }
    };

    let [tx, ty, tz] = number_array::<3>(&fields, "translation");
    let [rx, ry, rz] = number_array::<3>(&fields, "rotation");
    let [px, py] = number_array::<2>(&fields, "trackpad");

    Ok(TelemetryFrame {
        device_id: number(&fields, "id"),
        translation: DVec3::new(tx, ty, tz),
        rotation: DVec3::new(rx, ry, rz),
        trackpad: DVec2::new(px, py),
        trackpad_clicked: fields.get("clicked").and_then(Value::as_bool).unwrap_or(false),
        trigger: number(&fields, "trigger"),
    })
}

fn number(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn number_array<const N: usize>(fields: &Map<String, Value>, key: &str) -> [f64; N] {
    let mut out = [0.0; N];
    if let Some(Value::Array(items)) = fields.get(key) {
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item.as_f64().unwrap_or(0.0);
        }
    }
    out
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_record() {
        let frame = decode(
            br#"{"id":1,"translation":[0.5,-1.0,2.25],"rotation":[10,20,30],
                 "trackpad":[-0.5,0.75],"clicked":true,"trigger":0.8}"#,
        )
        .unwrap();

        assert_eq!(frame.device_id, 1.0);
        assert_eq!(frame.translation, DVec3::new(0.5, -1.0, 2.25));
        assert_eq!(frame.rotation, DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(frame.trackpad, DVec2::new(-0.5, 0.75));
        assert!(frame.trackpad_clicked);
        assert!((frame.trigger - 0.8).abs() < 1e-12);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let frame = decode(b"{}").unwrap();
        assert_eq!(frame, TelemetryFrame::default());
    }

    #[test]
    fn mistyped_and_short_fields_degrade_per_field() {
        let frame = decode(
            br#"{"id":"1","translation":[3],"rotation":[1,"x",2],"clicked":1,"trigger":null}"#,
        )
        .unwrap();

        assert_eq!(frame.device_id, 0.0);
        assert_eq!(frame.translation, DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(frame.rotation, DVec3::new(1.0, 0.0, 2.0));
        assert!(!frame.trackpad_clicked);
        assert_eq!(frame.trigger, 0.0);
    }

    #[test]
    fn extra_array_elements_are_ignored() {
        let frame = decode(br#"{"trackpad":[0.1,0.2,0.3]}"#).unwrap();
        assert_eq!(frame.trackpad, DVec2::new(0.1, 0.2));
    }

    #[test]
    fn broken_json_is_malformed_with_diagnostic() {
        match decode(b"{not json") {
            Err(TelemetryError::Malformed(msg)) => assert!(!msg.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_object_root_is_malformed() {
        match decode(b"[0,1,2]") {
            Err(TelemetryError::Malformed(msg)) => assert!(msg.contains("an array")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(matches!(decode(b""), Err(TelemetryError::Malformed(_))));
    }
}
