//! Markdown 帧控制器
//!
//! 与代码帧共用桥接与路由基础，但命令面更小：整篇笔记在一个帧里编辑，
//! 高度与块间导航都不需要。

use crate::core::{FrameConfig, KeyInput};

use super::bridge::{parse_command, Bridge, MessageSink};
use super::controller::KeyForwarder;
use super::message::{BridgeEvent, MarkdownCommand, MarkdownInitPayload};
use super::router::{route_markdown, KeyDecision, RouteContext};
use super::widget::{CursorPosition, EditorWidget, Theme, WidgetOptions};

pub struct MarkdownController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    widget: W,
    bridge: Bridge<S>,
    forwarder: F,
    config: FrameConfig,
    change_silent: bool,
}

impl<W, S, F> MarkdownController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    pub fn new(mut widget: W, sink: S, forwarder: F, config: FrameConfig) -> Self {
        let options = WidgetOptions::markdown(Theme::for_dark_mode(config.dark_theme));
        widget.apply_options(&options);
        Self {
            widget,
            bridge: Bridge::new(sink),
            forwarder,
            config,
            change_silent: false,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn dispatch_raw(&mut self, raw: &serde_json::Value) {
        if let Some(command) = parse_command::<MarkdownCommand>(raw) {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: MarkdownCommand) {
        match command {
            MarkdownCommand::Init(payload) => self.init(payload),
            MarkdownCommand::Focus => {
                if !self.widget.is_focused() {
                    self.widget.focus();
                }
            }
            MarkdownCommand::SetReadOnly(read_only) => self.widget.set_read_only(read_only),
        }
    }

    fn init(&mut self, payload: MarkdownInitPayload) {
        self.bridge.bind(payload.key);
        self.change_silent = true;
        self.widget
            .set_content(payload.content.as_deref().unwrap_or(""));
        let _ = self.widget.take_change_event();
        self.change_silent = false;
        self.widget.set_read_only(payload.is_read_only);
    }

    pub fn on_widget_change(&mut self) {
        if !self.widget.take_change_event() {
            return;
        }
        if self.change_silent {
            return;
        }
        self.bridge.send(BridgeEvent::OnChange(self.widget.content()));
    }

    pub fn handle_key(&mut self, key: &KeyInput, frame_focused: bool) -> KeyDecision {
        let ctx = RouteContext {
            frame_focused,
            cursor: CursorPosition::default(),
            line_count: self.widget.screen_line_count(),
            content_empty: self.widget.content().is_empty(),
            platform: self.config.platform,
        };
        let decision = route_markdown(key, &ctx);
        if decision.blur_widget {
            self.widget.blur();
        }
        if let Some(target) = decision.forward {
            self.forwarder.forward(target, key);
        }
        if let Some(event) = &decision.notify {
            self.bridge.send(event.clone());
        }
        decision
    }
}


#[cfg(test)]
impl<W, S, F> MarkdownController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    pub(crate) fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }
}
