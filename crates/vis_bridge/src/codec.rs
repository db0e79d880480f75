//! Message Codec
//!
//! Inbound messages from the embedded content are JSON envelopes of two
//! shapes:
//!
//! - event notification: `{ "eventName": .., "visNetworkCallbackId": .., ...fields }`
//! - method result: `{ "result": .., "visNetworkCallbackId": .. }`
//!
//! A payload carrying both a non-empty `eventName` and a `result` is routed
//! as an event notification.

use serde_json::{Map, Value};

use crate::cache::CallbackId;
use crate::error::CodecError;

/// Envelope field carrying the correlation id
pub const CALLBACK_ID_FIELD: &str = "visNetworkCallbackId";
/// Envelope field carrying the event name
pub const EVENT_NAME_FIELD: &str = "eventName";
/// Envelope field carrying a method result
pub const RESULT_FIELD: &str = "result";

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryMessage {
    /// An event fired by a subscribed listener
    Event {
        event_name: String,
        callback_id: CallbackId,
        /// Every envelope field except the correlation id
        payload: Value,
    },
    /// The value returned by a result-bearing call; `null` is a valid result
    MethodResult {
        callback_id: CallbackId,
        result: Value,
    },
}

impl BoundaryMessage {
    pub fn callback_id(&self) -> &CallbackId {
        match self {
            BoundaryMessage::Event { callback_id, .. } => callback_id,
            BoundaryMessage::MethodResult { callback_id, .. } => callback_id,
        }
    }
}

/// Parse and classify a raw inbound payload
pub fn decode(raw: &str) -> Result<BoundaryMessage, CodecError> {
    let value: Value = serde_json::from_str(raw)?;
    classify(value)
}

/// Classify an already parsed payload
pub fn classify(value: Value) -> Result<BoundaryMessage, CodecError> {
    let Value::Object(mut fields) = value else {
        return Err(CodecError::Unrecognized);
    };

    let Some(callback_id) = non_empty_str(&fields, CALLBACK_ID_FIELD).map(CallbackId::from) else {
        return Err(CodecError::Unrecognized);
    };

    if let Some(event_name) = non_empty_str(&fields, EVENT_NAME_FIELD) {
        let event_name = event_name.to_string();
        fields.remove(CALLBACK_ID_FIELD);
        return Ok(BoundaryMessage::Event {
            event_name,
            callback_id,
            payload: Value::Object(fields),
        });
    }

    match fields.remove(RESULT_FIELD) {
        Some(result) => Ok(BoundaryMessage::MethodResult {
            callback_id,
            result,
        }),
        None => Err(CodecError::Unrecognized),
    }
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_notification() {
        let msg = decode(r#"{"eventName":"click","visNetworkCallbackId":"abc","nodes":[1]}"#).unwrap();
        assert_eq!(
            msg,
            BoundaryMessage::Event {
                event_name: "click".to_string(),
                callback_id: CallbackId::from("abc"),
                payload: json!({"eventName": "click", "nodes": [1]}),
            }
        );
    }

    #[test]
    fn test_method_result() {
        let msg = decode(r#"{"result":{"x":1,"y":2},"visNetworkCallbackId":"abc"}"#).unwrap();
        assert_eq!(
            msg,
            BoundaryMessage::MethodResult {
                callback_id: CallbackId::from("abc"),
                result: json!({"x": 1, "y": 2}),
            }
        );
    }

    #[test]
    fn test_null_result_is_defined() {
        let msg = decode(r#"{"result":null,"visNetworkCallbackId":"abc"}"#).unwrap();
        assert!(matches!(msg, BoundaryMessage::MethodResult { result: Value::Null, .. }));
    }

    #[test]
    fn test_event_takes_precedence() {
        let msg = decode(
            r#"{"eventName":"zoom","result":3,"visNetworkCallbackId":"abc"}"#,
        )
        .unwrap();
        let BoundaryMessage::Event { event_name, payload, .. } = msg else {
            panic!("ambiguous payload must route as an event");
        };
        assert_eq!(event_name, "zoom");
        assert_eq!(payload["result"], json!(3));
    }

    #[test]
    fn test_empty_event_name_falls_back_to_result() {
        let msg = decode(r#"{"eventName":"","result":1,"visNetworkCallbackId":"abc"}"#).unwrap();
        assert!(matches!(msg, BoundaryMessage::MethodResult { .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(decode("{not json"), Err(CodecError::InvalidJson(_))));
    }

    #[test]
    fn test_unrecognized_shapes() {
        for raw in [
            "42",
            "[]",
            r#"{}"#,
            r#"{"result":1}"#,
            r#"{"result":1,"visNetworkCallbackId":""}"#,
            r#"{"result":1,"visNetworkCallbackId":7}"#,
            r#"{"eventName":"click"}"#,
            r#"{"visNetworkCallbackId":"abc"}"#,
        ] {
            assert!(
                matches!(decode(raw), Err(CodecError::Unrecognized)),
                "expected unrecognized: {}",
                raw
            );
        }
    }
}
