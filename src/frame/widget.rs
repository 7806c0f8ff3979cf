//! 编辑组件适配层
//!
//! 把第三方嵌入编辑组件归一化为内容/光标/焦点原语。

use super::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub row: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Normalization layer over the embedded text-editing component.
///
/// Mutating calls may mark a pending change event inside the adapter;
/// [`EditorWidget::take_change_event`] drains it. The controller drains
/// synchronously inside its suppression window for programmatic writes, so
/// no observer ever sees the widget "changed but not yet flagged".
pub trait EditorWidget {
    fn set_content(&mut self, text: &str);
    fn content(&self) -> String;
    fn set_language(&mut self, language: Language);
    fn set_read_only(&mut self, read_only: bool);
    fn focus(&mut self);
    fn blur(&mut self);
    fn is_focused(&self) -> bool;
    fn cursor_position(&self) -> CursorPosition;
    fn navigate_to(&mut self, row: usize, column: usize);
    fn navigate_document_start(&mut self);
    fn navigate_document_end(&mut self);
    fn insert_at_cursor(&mut self, text: &str);
    /// Current rendered line/screen length.
    fn screen_line_count(&self) -> usize;
    fn clear_selection(&mut self);
    /// True when a content change happened since the last drain.
    fn take_change_event(&mut self) -> bool;
    fn apply_options(&mut self, options: &WidgetOptions);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Monokai,
    Textmate,
}

impl Theme {
    pub fn for_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Monokai
        } else {
            Theme::Textmate
        }
    }
}

/// Option block applied to the widget at frame startup.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    pub show_gutter: bool,
    pub show_line_numbers: bool,
    pub show_fold_widgets: bool,
    pub show_print_margin: bool,
    pub highlight_active_line: bool,
    pub highlight_selected_word: bool,
    pub highlight_gutter_line: bool,
    pub auto_scroll_into_view: bool,
    pub drag_enabled: bool,
    pub multiselect: bool,
    /// The code frame disables the widget's own find so Ctrl/Cmd-F can be
    /// forwarded to the parent.
    pub builtin_find: bool,
    pub tooltip_follows_mouse: bool,
    pub manual_fold_only: bool,
    pub font_size: u8,
    pub tab_size: u8,
    pub slim_cursor: bool,
    /// Grow-with-content ceiling; the frame is resized from outside.
    pub max_lines: u32,
    pub theme: Theme,
}

impl WidgetOptions {
    /// The general code/content frame: all chrome off, grows with content.
    pub fn code(theme: Theme) -> Self {
        Self {
            show_gutter: false,
            show_line_numbers: false,
            show_fold_widgets: false,
            show_print_margin: false,
            highlight_active_line: false,
            highlight_selected_word: false,
            highlight_gutter_line: false,
            auto_scroll_into_view: false,
            drag_enabled: false,
            multiselect: false,
            builtin_find: false,
            tooltip_follows_mouse: false,
            manual_fold_only: true,
            font_size: 14,
            tab_size: 2,
            slim_cursor: true,
            max_lines: 999_999_999,
            theme,
        }
    }

    /// The markdown frame keeps its own scrolling and a fixed height.
    pub fn markdown(theme: Theme) -> Self {
        Self {
            show_gutter: true,
            show_line_numbers: true,
            show_fold_widgets: true,
            highlight_selected_word: true,
            highlight_gutter_line: true,
            auto_scroll_into_view: true,
            builtin_find: true,
            max_lines: 0,
            ..Self::code(theme)
        }
    }
}
