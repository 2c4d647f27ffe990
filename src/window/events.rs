//! The events a window reports between two frames.

use smallvec::SmallVec;

/// The events collected by one poll of the window system.
pub type Events = SmallVec<[Event; 16]>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// The modifier keys held down while an event happened.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// The keys with a layout-independent meaning. Everything else is reported as
/// `Key::Unknown` along with its scancode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Digit(u8),
    Function(u8),
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    Key {
        key: Key,
        scancode: u32,
        action: Action,
        modifiers: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    },
    /// The cursor moved to `(x, y)`, in pixels from the top-left corner of the client
    /// area.
    CursorMoved { x: f64, y: f64 },
    Scroll { dx: f64, dy: f64 },
    /// The drawable area has been resized, in pixels.
    Resized { width: u32, height: u32 },
    CloseRequested,
}
