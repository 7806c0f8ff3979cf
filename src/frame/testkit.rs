//! Test doubles shared by the frame unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{ForwardTarget, KeyInput};

use super::bridge::MessageSink;
use super::controller::KeyForwarder;
use super::language::Language;
use super::message::EventMessage;
use super::widget::{CursorPosition, EditorWidget, WidgetOptions};

#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Rc<RefCell<Vec<EventMessage>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<EventMessage> {
        self.messages.borrow().clone()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl MessageSink for RecordingSink {
    fn post(&self, message: EventMessage) {
        self.messages.borrow_mut().push(message);
    }
}

#[derive(Clone, Default)]
pub struct RecordingForwarder {
    forwards: Rc<RefCell<Vec<(ForwardTarget, KeyInput)>>>,
}

impl RecordingForwarder {
    pub fn forwards(&self) -> Vec<(ForwardTarget, KeyInput)> {
        self.forwards.borrow().clone()
    }
}

impl KeyForwarder for RecordingForwarder {
    fn forward(&self, target: ForwardTarget, key: &KeyInput) {
        self.forwards.borrow_mut().push((target, *key));
    }
}

/// In-memory widget with the line/cursor arithmetic the controllers rely on.
pub struct FakeWidget {
    pub content: String,
    pub language: Language,
    pub read_only: bool,
    pub focused: bool,
    pub cursor: CursorPosition,
    pub selection_cleared: usize,
    pub focus_calls: usize,
    pub options: Option<WidgetOptions>,
    pending_change: bool,
}

impl FakeWidget {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            language: Language::PlainText,
            read_only: false,
            focused: false,
            cursor: CursorPosition::default(),
            selection_cleared: 0,
            focus_calls: 0,
            options: None,
            pending_change: false,
        }
    }

    /// Simulate a user-driven edit: content replaced, change event pending.
    pub fn user_edit(&mut self, content: &str) {
        self.content = content.to_string();
        self.pending_change = true;
    }

    fn offset_of(&self, row: usize, column: usize) -> usize {
        let mut offset = 0;
        for (index, line) in self.content.split('\n').enumerate() {
            if index == row {
                return offset + column.min(line.len());
            }
            offset += line.len() + 1;
        }
        self.content.len()
    }

    fn position_of(&self, offset: usize) -> CursorPosition {
        let before = &self.content[..offset.min(self.content.len())];
        let row = before.matches('\n').count();
        let column = before
            .rsplit_once('\n')
            .map(|(_, tail)| tail.len())
            .unwrap_or(before.len());
        CursorPosition::new(row, column)
    }
}

impl Default for FakeWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorWidget for FakeWidget {
    fn set_content(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = CursorPosition::default();
        self.pending_change = true;
    }

    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn focus(&mut self) {
        if !self.focused {
            self.focus_calls += 1;
        }
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn cursor_position(&self) -> CursorPosition {
        self.cursor
    }

    fn navigate_to(&mut self, row: usize, column: usize) {
        self.cursor = CursorPosition::new(row, column);
    }

    fn navigate_document_start(&mut self) {
        self.cursor = CursorPosition::default();
    }

    fn navigate_document_end(&mut self) {
        self.cursor = self.position_of(self.content.len());
    }

    fn insert_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = self.offset_of(self.cursor.row, self.cursor.column);
        self.content.insert_str(offset, text);
        self.cursor = self.position_of(offset + text.len());
        self.pending_change = true;
    }

    fn screen_line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    fn clear_selection(&mut self) {
        self.selection_cleared += 1;
    }

    fn take_change_event(&mut self) -> bool {
        std::mem::take(&mut self.pending_change)
    }

    fn apply_options(&mut self, options: &WidgetOptions) {
        self.options = Some(options.clone());
    }
}
