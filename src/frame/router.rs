//! 按键路由决策表
//!
//! The frame is an isolated execution context with its own focus and event
//! loop; shortcuts and arrow navigation that should feel document-wide would
//! otherwise stop at the frame boundary. Rules are evaluated top to bottom;
//! the first rule that claims the key returns the full decision.

use crate::core::{ForwardTarget, KeyCode, KeyInput, Platform};

use super::message::BridgeEvent;
use super::widget::CursorPosition;

/// Snapshot of the frame state a routing decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext {
    /// Whether the frame's document currently has input focus.
    pub frame_focused: bool,
    pub cursor: CursorPosition,
    /// Cached rendered line count (see `HeightTracker`).
    pub line_count: usize,
    pub content_empty: bool,
    pub platform: Platform,
}

/// What to do with one physical key event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyDecision {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub blur_widget: bool,
    pub forward: Option<ForwardTarget>,
    pub notify: Option<BridgeEvent>,
}

impl KeyDecision {
    /// No interception; the widget's default behavior applies.
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn is_pass(&self) -> bool {
        *self == Self::default()
    }
}

type Rule = fn(&KeyInput, &RouteContext) -> Option<KeyDecision>;

const CODE_RULES: &[Rule] = &[
    submit_keys,
    backspace_on_empty,
    arrow_down,
    arrow_up,
    escape,
    code_accelerators,
];

const MARKDOWN_RULES: &[Rule] = &[escape, markdown_accelerators];

fn route(rules: &[Rule], key: &KeyInput, ctx: &RouteContext) -> KeyDecision {
    for rule in rules {
        if let Some(decision) = rule(key, ctx) {
            return decision;
        }
    }
    KeyDecision::pass()
}

pub fn route_code(key: &KeyInput, ctx: &RouteContext) -> KeyDecision {
    route(CODE_RULES, key, ctx)
}

pub fn route_markdown(key: &KeyInput, ctx: &RouteContext) -> KeyDecision {
    route(MARKDOWN_RULES, key, ctx)
}

/// Enter/Tab reach the parent's global shortcuts while focus is nested in
/// an unfocused frame; with focus present the widget handles them.
fn submit_keys(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    if !matches!(
        key.code,
        KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Tab
    ) {
        return None;
    }
    if ctx.frame_focused {
        return Some(KeyDecision::pass());
    }
    Some(KeyDecision {
        prevent_default: true,
        stop_propagation: true,
        forward: Some(ForwardTarget::ParentWindow),
        ..KeyDecision::pass()
    })
}

/// Backspacing out of an already-empty block deletes the block.
fn backspace_on_empty(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    if key.code != KeyCode::Backspace {
        return None;
    }
    if ctx.line_count == 1 && ctx.content_empty {
        return Some(KeyDecision {
            notify: Some(BridgeEvent::RemoveEditor),
            ..KeyDecision::pass()
        });
    }
    Some(KeyDecision::pass())
}

fn arrow_down(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    if key.code != KeyCode::ArrowDown {
        return None;
    }
    if !ctx.frame_focused {
        return Some(KeyDecision {
            prevent_default: true,
            forward: Some(ForwardTarget::ParentWindow),
            ..KeyDecision::pass()
        });
    }
    if ctx.cursor.row + 1 == ctx.line_count {
        return Some(KeyDecision {
            prevent_default: true,
            stop_propagation: true,
            blur_widget: true,
            notify: Some(BridgeEvent::MoveDown(ctx.cursor.column)),
            ..KeyDecision::pass()
        });
    }
    // not on the last row: the widget moves the cursor internally
    Some(KeyDecision {
        prevent_default: true,
        ..KeyDecision::pass()
    })
}

fn arrow_up(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    if key.code != KeyCode::ArrowUp {
        return None;
    }
    if !ctx.frame_focused {
        return Some(KeyDecision {
            prevent_default: true,
            forward: Some(ForwardTarget::ParentWindow),
            ..KeyDecision::pass()
        });
    }
    if ctx.cursor.row == 0 {
        return Some(KeyDecision {
            prevent_default: true,
            stop_propagation: true,
            blur_widget: true,
            notify: Some(BridgeEvent::MoveUp(ctx.cursor.column)),
            ..KeyDecision::pass()
        });
    }
    Some(KeyDecision {
        prevent_default: true,
        ..KeyDecision::pass()
    })
}

/// Escape always belongs to the parent's modal/global handling.
fn escape(key: &KeyInput, _ctx: &RouteContext) -> Option<KeyDecision> {
    if key.code != KeyCode::Escape {
        return None;
    }
    Some(KeyDecision {
        prevent_default: true,
        blur_widget: true,
        forward: Some(ForwardTarget::ParentWindow),
        ..KeyDecision::pass()
    })
}

fn accelerators(
    key: &KeyInput,
    ctx: &RouteContext,
    allowed: &[KeyCode],
) -> Option<KeyDecision> {
    if !ctx.platform.accelerator(&key.modifiers) {
        return None;
    }
    if !allowed.contains(&key.code) {
        return None;
    }
    // comment toggle is additionally gated on alt
    if key.code == KeyCode::Slash && !key.modifiers.alt {
        return None;
    }
    // undo stays scoped to the parent's editing region
    let target = if key.code == KeyCode::Char('z') {
        ForwardTarget::EditorBody
    } else {
        ForwardTarget::ParentWindow
    };
    Some(KeyDecision {
        prevent_default: true,
        stop_propagation: true,
        forward: Some(target),
        ..KeyDecision::pass()
    })
}

fn code_accelerators(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    accelerators(
        key,
        ctx,
        &[
            KeyCode::Char('z'),
            KeyCode::Char('n'),
            KeyCode::Char('f'),
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::Slash,
        ],
    )
}

fn markdown_accelerators(key: &KeyInput, ctx: &RouteContext) -> Option<KeyDecision> {
    accelerators(
        key,
        ctx,
        &[
            KeyCode::Char('n'),
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::Slash,
        ],
    )
}
