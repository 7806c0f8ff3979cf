//! 代码帧控制器
//!
//! 解析父文档下发的命令，驱动编辑组件，并把组件事件转为桥接消息。

use crate::core::{ForwardTarget, FrameConfig, KeyInput};

use super::bridge::{parse_command, Bridge, MessageSink};
use super::height::HeightTracker;
use super::language::Language;
use super::message::{BridgeEvent, EditorCommand, FocusPayload, InitPayload};
use super::router::{route_code, KeyDecision, RouteContext};
use super::widget::{EditorWidget, Theme, WidgetOptions};

/// Capability handle for re-dispatching a key event outside the frame.
pub trait KeyForwarder {
    fn forward(&self, target: ForwardTarget, key: &KeyInput);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
}

/// One controller per frame context; owns all frame-scoped state.
pub struct FrameController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    widget: W,
    bridge: Bridge<S>,
    forwarder: F,
    config: FrameConfig,
    height: HeightTracker,
    change_silent: bool,
    phase: Phase,
}

impl<W, S, F> FrameController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    pub fn new(mut widget: W, sink: S, forwarder: F, config: FrameConfig) -> Self {
        let options = WidgetOptions::code(Theme::for_dark_mode(config.dark_theme));
        widget.apply_options(&options);
        Self {
            widget,
            bridge: Bridge::new(sink),
            forwarder,
            config,
            height: HeightTracker::new(),
            change_silent: false,
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn line_count(&self) -> usize {
        self.height.line_count()
    }

    /// Dispatch one raw inbound message. Messages that do not parse as a
    /// command are dropped: the channel carries traffic for other consumers.
    pub fn dispatch_raw(&mut self, raw: &serde_json::Value) {
        if let Some(command) = parse_command::<EditorCommand>(raw) {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Init(payload) => self.init(payload),
            EditorCommand::ChangeLang(lang) => self.change_lang(&lang),
            EditorCommand::SetFocus(payload) => self.set_focus(payload),
            EditorCommand::InsertText(text) => self.insert_text(&text),
            EditorCommand::AppendText(text) => self.append_text(&text),
            EditorCommand::SetValue(value) => self.set_value(value.as_deref().unwrap_or("")),
            EditorCommand::SetReadOnly(read_only) => self.widget.set_read_only(read_only),
        }
    }

    fn init(&mut self, payload: InitPayload) {
        self.bridge.bind(payload.key);
        self.widget
            .set_language(Language::from_token(payload.lang.as_deref().unwrap_or("")));
        self.set_content_silently(payload.content.as_deref().unwrap_or(""));
        self.height_recheck();
        if payload.auto_focus {
            self.widget.focus();
        }
        if payload.is_read_only {
            self.widget.set_read_only(true);
        }
        self.phase = Phase::Ready;
    }

    fn change_lang(&mut self, lang: &str) {
        self.widget.set_language(Language::from_token(lang));
        self.widget.focus();
    }

    fn set_focus(&mut self, payload: FocusPayload) {
        if self.widget.is_focused() {
            return;
        }
        self.widget.focus();
        if payload.direction > 0 {
            self.widget.navigate_to(0, payload.offset);
        } else {
            let last_row = self.height.line_count().saturating_sub(1);
            self.widget.navigate_to(last_row, payload.offset);
        }
    }

    fn insert_text(&mut self, text: &str) {
        self.widget.focus();
        self.widget.navigate_document_start();
        self.widget.insert_at_cursor(text);
        self.on_widget_change();
    }

    /// Append at the document end without disturbing the cursor.
    fn append_text(&mut self, text: &str) {
        self.widget.focus();
        self.widget.navigate_document_end();
        if text.is_empty() {
            return;
        }
        let cursor = self.widget.cursor_position();
        self.widget.insert_at_cursor(text);
        self.widget.navigate_to(cursor.row, cursor.column);
        self.on_widget_change();
    }

    fn set_value(&mut self, value: &str) {
        self.set_content_silently(value);
        self.height_recheck();
    }

    /// Flag-set → mutate → flag-clear, with no yield in between: the change
    /// the widget records here is drained before anything can observe it.
    fn set_content_silently(&mut self, text: &str) {
        self.change_silent = true;
        self.widget.set_content(text);
        let _ = self.widget.take_change_event();
        self.change_silent = false;
    }

    fn height_recheck(&mut self) {
        let lines = self.widget.screen_line_count();
        if let Some(height) = self.height.check(lines, &self.config) {
            self.bridge.send(BridgeEvent::SetHeight(height));
        }
    }

    /// Entry point for the widget's change signal.
    pub fn on_widget_change(&mut self) {
        if !self.widget.take_change_event() {
            return;
        }
        if self.change_silent {
            return;
        }
        self.bridge.send(BridgeEvent::OnChange(self.widget.content()));
        self.height_recheck();
    }

    pub fn on_widget_focus(&mut self) {
        self.bridge.send(BridgeEvent::ShowLang);
    }

    pub fn on_widget_blur(&mut self) {
        self.bridge.send(BridgeEvent::HideLang);
        self.widget.clear_selection();
    }

    /// The frame window regained OS focus.
    pub fn on_window_focus(&mut self, frame_focused: bool) {
        if frame_focused && !self.widget.is_focused() {
            self.widget.focus();
        }
    }

    /// Mousedown inside a frame whose document is not focused reclaims it.
    pub fn on_mouse_down(&mut self, frame_focused: bool) {
        if !frame_focused {
            self.widget.focus();
        }
    }

    /// Route one raw key event and execute the decision. The returned
    /// decision tells the embedding glue what to do with the native event.
    pub fn handle_key(&mut self, key: &KeyInput, frame_focused: bool) -> KeyDecision {
        let ctx = RouteContext {
            frame_focused,
            cursor: self.widget.cursor_position(),
            line_count: self.height.line_count(),
            content_empty: self.widget.content().is_empty(),
            platform: self.config.platform,
        };
        let decision = route_code(key, &ctx);
        self.execute(&decision, key);
        decision
    }

    fn execute(&mut self, decision: &KeyDecision, key: &KeyInput) {
        if decision.blur_widget {
            self.widget.blur();
        }
        if let Some(target) = decision.forward {
            self.forwarder.forward(target, key);
        }
        if let Some(event) = &decision.notify {
            self.bridge.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testkit::{FakeWidget, RecordingForwarder, RecordingSink};
    use super::*;
    use crate::core::KeyCode;
    use crate::frame::message::FrameKey;
    use serde_json::json;

    fn controller() -> (
        FrameController<FakeWidget, RecordingSink, RecordingForwarder>,
        RecordingSink,
        RecordingForwarder,
    ) {
        let sink = RecordingSink::default();
        let forwarder = RecordingForwarder::default();
        let controller = FrameController::new(
            FakeWidget::new(),
            sink.clone(),
            forwarder.clone(),
            FrameConfig {
                line_height: 20,
                height_padding: 16,
                platform: crate::core::Platform::Other,
                dark_theme: false,
            },
        );
        (controller, sink, forwarder)
    }

    fn init_payload(content: &str) -> InitPayload {
        InitPayload {
            key: FrameKey::new("k"),
            lang: Some("rust".into()),
            content: Some(content.into()),
            auto_focus: false,
            is_read_only: false,
        }
    }

    #[test]
    fn test_starts_uninitialized_with_code_options() {
        let (controller, _, _) = controller();
        assert_eq!(controller.phase(), Phase::Uninitialized);
        let options = controller.widget().options.as_ref().unwrap();
        assert!(!options.show_gutter);
        assert!(!options.builtin_find);
    }

    #[test]
    fn test_init_is_silent_and_reports_height() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nb\nc")));

        assert_eq!(controller.phase(), Phase::Ready);
        assert_eq!(controller.widget().content, "a\nb\nc");
        // only the height report, never onChange
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, FrameKey::new("k"));
        assert_eq!(events[0].event, BridgeEvent::SetHeight(76));
    }

    #[test]
    fn test_init_single_line_sends_no_height() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("one line")));
        // line count stays at the initial 1, nothing to report
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_init_applies_focus_and_read_only_flags() {
        let (mut controller, _, _) = controller();
        let mut payload = init_payload("");
        payload.auto_focus = true;
        payload.is_read_only = true;
        controller.apply(EditorCommand::Init(payload));
        assert!(controller.widget().focused);
        assert!(controller.widget().read_only);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let (mut controller, _, _) = controller();
        let mut payload = init_payload("");
        payload.lang = Some("klingon".into());
        controller.apply(EditorCommand::Init(payload));
        assert_eq!(controller.widget().language, Language::PlainText);
    }

    #[test]
    fn test_user_edit_sends_on_change_then_height() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));
        sink.clear();

        controller.widget_mut().user_edit("hello\nworld");
        controller.on_widget_change();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, BridgeEvent::OnChange("hello\nworld".into()));
        assert_eq!(events[1].event, BridgeEvent::SetHeight(56));
    }

    #[test]
    fn test_user_edit_without_height_change_sends_only_on_change() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a")));
        sink.clear();

        controller.widget_mut().user_edit("b");
        controller.on_widget_change();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, BridgeEvent::OnChange("b".into()));
    }

    #[test]
    fn test_spurious_change_signal_sends_nothing() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a")));
        sink.clear();
        controller.on_widget_change();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_set_value_round_trip_without_on_change() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("old")));
        sink.clear();

        for value in ["new content", ""] {
            controller.apply(EditorCommand::SetValue(Some(value.to_string())));
            assert_eq!(controller.widget().content, value);
        }
        for message in sink.events() {
            assert!(!matches!(message.event, BridgeEvent::OnChange(_)));
        }
    }

    #[test]
    fn test_set_value_none_clears_content() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("old")));
        controller.apply(EditorCommand::SetValue(None));
        assert_eq!(controller.widget().content, "");
    }

    #[test]
    fn test_set_value_rechecks_height() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nb")));
        sink.clear();

        controller.apply(EditorCommand::SetValue(Some("a".into())));
        assert_eq!(sink.events().last().unwrap().event, BridgeEvent::SetHeight(36));
    }

    #[test]
    fn test_insert_text_prepends_and_notifies() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("world")));
        sink.clear();

        controller.apply(EditorCommand::InsertText("hello ".into()));
        assert_eq!(controller.widget().content, "hello world");
        assert_eq!(
            sink.events()[0].event,
            BridgeEvent::OnChange("hello world".into())
        );
    }

    #[test]
    fn test_append_text_preserves_cursor() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("start")));
        sink.clear();

        controller.apply(EditorCommand::AppendText("\nend".into()));
        assert_eq!(controller.widget().content, "start\nend");
        // cursor parked back where the document ended before the append
        assert_eq!(controller.widget().cursor.row, 0);
        assert_eq!(controller.widget().cursor.column, 5);
        assert!(matches!(
            sink.events()[0].event,
            BridgeEvent::OnChange(_)
        ));
    }

    #[test]
    fn test_append_empty_text_is_a_focus_only_no_op() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("x")));
        sink.clear();

        controller.apply(EditorCommand::AppendText(String::new()));
        assert_eq!(controller.widget().content, "x");
        assert!(controller.widget().focused);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_set_focus_from_above_and_below() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nb\nc")));

        controller.apply(EditorCommand::SetFocus(FocusPayload {
            direction: 1,
            offset: 2,
        }));
        assert!(controller.widget().focused);
        assert_eq!(controller.widget().cursor.row, 0);
        assert_eq!(controller.widget().cursor.column, 2);

        controller.widget_mut().blur();
        controller.apply(EditorCommand::SetFocus(FocusPayload {
            direction: -1,
            offset: 1,
        }));
        assert_eq!(controller.widget().cursor.row, 2);
        assert_eq!(controller.widget().cursor.column, 1);
    }

    #[test]
    fn test_set_focus_is_a_no_op_when_focused() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nb")));
        controller.widget_mut().focus();
        controller.widget_mut().cursor = super::super::widget::CursorPosition::new(1, 1);

        controller.apply(EditorCommand::SetFocus(FocusPayload {
            direction: 1,
            offset: 0,
        }));
        assert_eq!(controller.widget().cursor.row, 1);
        assert_eq!(controller.widget().cursor.column, 1);
    }

    #[test]
    fn test_change_lang_focuses() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));
        controller.apply(EditorCommand::ChangeLang("python".into()));
        assert_eq!(controller.widget().language, Language::Python);
        assert!(controller.widget().focused);
    }

    #[test]
    fn test_unknown_method_leaves_state_untouched() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("stable")));
        sink.clear();

        controller.dispatch_raw(&json!({"method": "selfDestruct", "payload": 42}));
        controller.dispatch_raw(&json!({"completely": "unrelated"}));

        assert_eq!(controller.widget().content, "stable");
        assert_eq!(controller.phase(), Phase::Ready);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_dispatch_raw_applies_known_command() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));
        controller.dispatch_raw(&json!({"method": "setReadOnly", "payload": true}));
        assert!(controller.widget().read_only);
    }

    #[test]
    fn test_arrow_down_last_row_blurs_and_notifies() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nbb")));
        controller.widget_mut().focus();
        controller.widget_mut().cursor = super::super::widget::CursorPosition::new(1, 2);
        sink.clear();

        let decision = controller.handle_key(&KeyInput::plain(KeyCode::ArrowDown), true);
        assert!(decision.prevent_default);
        assert!(!controller.widget().focused);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, BridgeEvent::MoveDown(2));
    }

    #[test]
    fn test_arrow_down_unfocused_forwards_to_parent() {
        let (mut controller, sink, forwarder) = controller();
        controller.apply(EditorCommand::Init(init_payload("a\nb")));
        sink.clear();

        let key = KeyInput::plain(KeyCode::ArrowDown);
        let decision = controller.handle_key(&key, false);
        assert!(decision.prevent_default);
        assert!(sink.events().is_empty());
        assert_eq!(forwarder.forwards(), vec![(ForwardTarget::ParentWindow, key)]);
    }

    #[test]
    fn test_backspace_on_empty_block_requests_removal() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));
        sink.clear();

        controller.handle_key(&KeyInput::plain(KeyCode::Backspace), true);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, BridgeEvent::RemoveEditor);

        sink.clear();
        controller.apply(EditorCommand::SetValue(Some("text".into())));
        sink.clear();
        controller.handle_key(&KeyInput::plain(KeyCode::Backspace), true);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_undo_accelerator_forwards_to_editor_body() {
        let (mut controller, _, forwarder) = controller();
        controller.apply(EditorCommand::Init(init_payload("x")));

        let key = KeyInput::ctrl(KeyCode::Char('z'));
        controller.handle_key(&key, true);
        assert_eq!(forwarder.forwards(), vec![(ForwardTarget::EditorBody, key)]);
    }

    #[test]
    fn test_focus_events_toggle_language_indicator() {
        let (mut controller, sink, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));
        sink.clear();

        controller.on_widget_focus();
        controller.on_widget_blur();
        let events: Vec<_> = sink.events().into_iter().map(|m| m.event).collect();
        assert_eq!(events, vec![BridgeEvent::ShowLang, BridgeEvent::HideLang]);
        assert_eq!(controller.widget().selection_cleared, 1);
    }

    #[test]
    fn test_focus_reclaim_rules() {
        let (mut controller, _, _) = controller();
        controller.apply(EditorCommand::Init(init_payload("")));

        controller.on_window_focus(false);
        assert!(!controller.widget().focused);
        controller.on_window_focus(true);
        assert!(controller.widget().focused);

        controller.widget_mut().blur();
        controller.on_mouse_down(true);
        assert!(!controller.widget().focused);
        controller.on_mouse_down(false);
        assert!(controller.widget().focused);
    }

    #[test]
    fn test_events_before_init_are_dropped() {
        let (mut controller, sink, _) = controller();
        controller.widget_mut().user_edit("typed before init");
        controller.on_widget_change();
        // no frame identity yet: nothing reaches the parent
        assert!(sink.events().is_empty());
    }
}

#[cfg(test)]
impl<W, S, F> FrameController<W, S, F>
where
    W: EditorWidget,
    S: MessageSink,
    F: KeyForwarder,
{
    pub(crate) fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }
}
