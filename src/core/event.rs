//! 按键事件模型
//!
//! 帧内收到的原始键盘事件，与具体运行环境解耦。

/// Physical key identity, named after the originating key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    NumpadEnter,
    Tab,
    Backspace,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Slash,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        }
    }

    pub fn meta() -> Self {
        Modifiers {
            meta: true,
            ..Modifiers::NONE
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, Modifiers::ctrl())
    }

    pub fn meta(code: KeyCode) -> Self {
        Self::new(code, Modifiers::meta())
    }
}

/// Which OS accelerator modifier counts as the platform accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    MacOs,
    #[default]
    Other,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// meta on macOS, ctrl everywhere else
    pub fn accelerator(self, modifiers: &Modifiers) -> bool {
        match self {
            Platform::MacOs => modifiers.meta,
            Platform::Other => modifiers.ctrl,
        }
    }
}

/// External event sink a synthesized key event can be re-dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardTarget {
    /// The parent document's window-level target.
    ParentWindow,
    /// The parent's editor-body container; undo must stay scoped to it.
    EditorBody,
}
