//! Host event stream fed into the engine

/// Key identity as seen at the key-down stage, before any character has been
/// inserted into the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Tab,
    Enter,
    Backspace,
    Other,
}

impl Key {
    /// The literal character a delimiter key would insert, for the
    /// trigger-key policy to re-append after an expansion
    pub fn delimiter_char(self) -> Option<char> {
        match self {
            Key::Space => Some(' '),
            Key::Tab => Some('\t'),
            Key::Enter => Some('\n'),
            _ => None,
        }
    }
}

/// One host event targeted at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Content of an editable surface changed (fires after the edit)
    Input,
    /// Key pressed (fires before the character is inserted)
    KeyDown { key: Key, shift: bool },
    Focus,
    Blur,
    Click,
}
