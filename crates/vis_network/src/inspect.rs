//! Human-readable classification of inbound envelopes, for `vis-network decode`.

use vis_bridge::{BoundaryMessage, decode};

/// One line describing how the bridge would route `raw`
pub fn describe_message(raw: &str) -> String {
    match decode(raw) {
        Ok(BoundaryMessage::Event {
            event_name,
            callback_id,
            payload,
        }) => format!("event {} -> {} {}", event_name, callback_id, payload),
        Ok(BoundaryMessage::MethodResult {
            callback_id,
            result,
        }) => format!("result -> {} {}", callback_id, result),
        Err(e) => format!("dropped ({})", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(
            describe_message(r#"{"result":null,"visNetworkCallbackId":"a1"}"#),
            "result -> a1 null"
        );
        assert_eq!(
            describe_message(r#"{"eventName":"zoom","visNetworkCallbackId":"b2","scale":2}"#),
            r#"event zoom -> b2 {"eventName":"zoom","scale":2}"#
        );
        assert_eq!(
            describe_message(r#"{"visNetworkCallbackId":"c3"}"#),
            "dropped (Unrecognized message shape)"
        );
        assert!(describe_message("{").starts_with("dropped (Invalid JSON"));
    }
}
