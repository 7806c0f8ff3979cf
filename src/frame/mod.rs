//! 帧消息核心
//!
//! 嵌入帧与父文档之间的桥接：消息通道、按键路由、高度上报、帧控制器。

pub mod bridge;
pub mod controller;
pub mod height;
pub mod language;
pub mod markdown;
pub mod message;
pub mod router;
#[cfg(test)]
pub(crate) mod testkit;
pub mod widget;

pub use bridge::{frame_channel, Bridge, FrameChannelReceiver, FrameChannelSender, MessageSink};
pub use controller::{FrameController, KeyForwarder, Phase};
pub use height::HeightTracker;
pub use language::Language;
pub use markdown::MarkdownController;
pub use message::{
    BridgeEvent, EditorCommand, EventMessage, FocusPayload, FrameKey, InitPayload,
    MarkdownCommand, MarkdownInitPayload,
};
pub use router::{route_code, route_markdown, KeyDecision, RouteContext};
pub use widget::{CursorPosition, EditorWidget, Theme, WidgetOptions};
