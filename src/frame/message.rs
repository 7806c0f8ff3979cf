//! Bridge wire vocabulary.
//!
//! Outbound events are `{key, type, payload}`, inbound commands are
//! `{method, payload}`; both use camelCase names so the parent side keeps
//! its existing message shapes.

use serde::{Deserialize, Serialize};

/// Opaque token assigned by the parent when it creates a frame.
///
/// Threaded through every outbound message so the parent can route it back
/// to the correct logical block. Set once during `init`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameKey(String);

impl FrameKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Frame → parent notifications. Fire-and-forget, at-most-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BridgeEvent {
    /// Content replaced by a user edit; carries the full content string.
    OnChange(String),
    /// The frame should resize to this pixel-equivalent height.
    SetHeight(u32),
    /// Focus lost; the parent may hide its language indicator.
    HideLang,
    /// Focus gained.
    ShowLang,
    /// Focus should move to the previous sibling block at this column.
    MoveUp(usize),
    /// Focus should move to the next sibling block at this column.
    MoveDown(usize),
    /// The block emptied out under Backspace and should be deleted.
    RemoveEditor,
}

/// One outbound bridge message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub key: FrameKey,
    #[serde(flatten)]
    pub event: BridgeEvent,
}

/// Parent → code frame commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "payload", rename_all = "camelCase")]
pub enum EditorCommand {
    Init(InitPayload),
    ChangeLang(String),
    SetFocus(FocusPayload),
    InsertText(String),
    AppendText(String),
    SetValue(Option<String>),
    SetReadOnly(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    pub key: FrameKey,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub auto_focus: bool,
    #[serde(default)]
    pub is_read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPayload {
    /// Positive: entering from the block above, cursor near document start.
    /// Otherwise: entering from below, cursor near document end.
    pub direction: i32,
    /// Column offset to preserve across the block boundary.
    #[serde(default)]
    pub offset: usize,
}

/// Parent → markdown frame commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "payload", rename_all = "camelCase")]
pub enum MarkdownCommand {
    Init(MarkdownInitPayload),
    Focus,
    SetReadOnly(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownInitPayload {
    pub key: FrameKey,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_read_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_message_wire_shape() {
        let message = EventMessage {
            key: FrameKey::new("block-3"),
            event: BridgeEvent::SetHeight(116),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({"key": "block-3", "type": "setHeight", "payload": 116})
        );
    }

    #[test]
    fn test_unit_event_has_no_payload() {
        let message = EventMessage {
            key: FrameKey::new("k"),
            event: BridgeEvent::RemoveEditor,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"key": "k", "type": "removeEditor"}));
    }

    #[test]
    fn test_on_change_payload_is_content() {
        let message = EventMessage {
            key: FrameKey::new("k"),
            event: BridgeEvent::OnChange("fn main() {}".into()),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "onChange");
        assert_eq!(value["payload"], "fn main() {}");
    }

    #[test]
    fn test_command_parses_from_wire_json() {
        let raw = json!({
            "method": "init",
            "payload": {
                "key": "block-1",
                "lang": "rust",
                "content": "let x = 1;",
                "autoFocus": true,
                "isReadOnly": false
            }
        });
        let command: EditorCommand = serde_json::from_value(raw).unwrap();
        match command {
            EditorCommand::Init(payload) => {
                assert_eq!(payload.key, FrameKey::new("block-1"));
                assert_eq!(payload.lang.as_deref(), Some("rust"));
                assert!(payload.auto_focus);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_payload_defaults() {
        let raw = json!({"method": "init", "payload": {"key": "k"}});
        let command: EditorCommand = serde_json::from_value(raw).unwrap();
        match command {
            EditorCommand::Init(payload) => {
                assert_eq!(payload.lang, None);
                assert_eq!(payload.content, None);
                assert!(!payload.auto_focus);
                assert!(!payload.is_read_only);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_method_fails_to_parse() {
        let raw = json!({"method": "reticulate", "payload": 1});
        assert!(serde_json::from_value::<EditorCommand>(raw).is_err());
    }

    #[test]
    fn test_set_focus_payload() {
        let raw = json!({"method": "setFocus", "payload": {"direction": -1, "offset": 4}});
        let command: EditorCommand = serde_json::from_value(raw).unwrap();
        assert_eq!(
            command,
            EditorCommand::SetFocus(FocusPayload {
                direction: -1,
                offset: 4
            })
        );
    }
}
