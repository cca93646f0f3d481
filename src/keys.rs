//! Physical keys and the server's key index layout.
//!
//! Platform adapters translate their raw codes into `PhysicalKey` once, at
//! the edge (see `drivers::console`). Everything past that point, including
//! the keymap, only ever sees this enum.

/// A physical key on a standard keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicalKey {
    Escape,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Num0,
    Minus,
    Equal,
    Backspace,
    Tab,
    Q,
    W,
    E,
    R,
    T,
    Y,
    U,
    I,
    O,
    P,
    LeftBracket,
    RightBracket,
    Enter,
    LeftControl,
    A,
    S,
    D,
    F,
    G,
    H,
    J,
    K,
    L,
    Semicolon,
    Apostrophe,
    GraveAccent,
    LeftShift,
    Backslash,
    Z,
    X,
    C,
    V,
    B,
    N,
    M,
    Comma,
    Period,
    Slash,
    RightShift,
    LeftAlt,
    Space,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Home,
    PageUp,
    End,
    PageDown,
    Insert,
    Delete,
    RightControl,
    RightAlt,
    ScrollLock,
    Left,
    Right,
    Up,
    Down,
    NumpadEnter,
}

/// Number of entries in the server-side keymap.
pub const KEY_INDEX_COUNT: u8 = 90;

impl PhysicalKey {
    /// Key index used by the server keymap, for keys that can be rebound.
    pub fn index(self) -> Option<u8> {
        use PhysicalKey::*;
        let index = match self {
            Num1 => 2,
            Num2 => 3,
            Num3 => 4,
            Num4 => 5,
            Num5 => 6,
            Num6 => 7,
            Num7 => 8,
            Num8 => 9,
            Num9 => 10,
            Num0 => 11,
            Minus => 12,
            Equal => 13,
            Q => 16,
            W => 17,
            E => 18,
            R => 19,
            T => 20,
            Y => 21,
            U => 22,
            I => 23,
            O => 24,
            P => 25,
            LeftBracket => 26,
            RightBracket => 27,
            LeftControl => 29,
            A => 30,
            S => 31,
            D => 32,
            F => 33,
            G => 34,
            H => 35,
            J => 36,
            K => 37,
            L => 38,
            Semicolon => 39,
            Apostrophe => 40,
            GraveAccent => 41,
            LeftShift => 42,
            Backslash => 43,
            Z => 44,
            X => 45,
            C => 46,
            V => 47,
            B => 48,
            N => 49,
            M => 50,
            Comma => 51,
            Period => 52,
            LeftAlt => 56,
            Space => 57,
            F1 => 59,
            F2 => 60,
            F3 => 61,
            F4 => 62,
            F5 => 63,
            F6 => 64,
            F7 => 65,
            F8 => 66,
            F9 => 67,
            F10 => 68,
            F11 => 69,
            F12 => 70,
            Home => 71,
            PageUp => 73,
            End => 79,
            CapsLock => 80,
            PageDown => 81,
            Insert => 82,
            Delete => 83,
            Escape => 84,
            RightControl => 85,
            RightShift => 86,
            RightAlt => 87,
            ScrollLock => 88,
            Backspace | Tab | Enter | Slash | Left | Right | Up | Down | NumpadEnter => {
                return None;
            }
        };
        Some(index)
    }

    /// Inverse of [`PhysicalKey::index`].
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.index() == Some(index))
    }

    /// The other half of a left/right modifier pair.
    pub fn modifier_partner(self) -> Option<Self> {
        use PhysicalKey::*;
        match self {
            LeftShift => Some(RightShift),
            RightShift => Some(LeftShift),
            LeftControl => Some(RightControl),
            RightControl => Some(LeftControl),
            LeftAlt => Some(RightAlt),
            RightAlt => Some(LeftAlt),
            _ => None,
        }
    }

    pub fn is_shift(self) -> bool {
        matches!(self, PhysicalKey::LeftShift | PhysicalKey::RightShift)
    }

    pub fn is_control(self) -> bool {
        matches!(self, PhysicalKey::LeftControl | PhysicalKey::RightControl)
    }

    pub fn is_alt(self) -> bool {
        matches!(self, PhysicalKey::LeftAlt | PhysicalKey::RightAlt)
    }

    pub fn is_enter(self) -> bool {
        matches!(self, PhysicalKey::Enter | PhysicalKey::NumpadEnter)
    }

    /// The character this key types, honoring shift.
    pub fn char(self, shift: bool) -> Option<char> {
        use PhysicalKey::*;
        let (plain, shifted) = match self {
            Num1 => ('1', '!'),
            Num2 => ('2', '@'),
            Num3 => ('3', '#'),
            Num4 => ('4', '$'),
            Num5 => ('5', '%'),
            Num6 => ('6', '^'),
            Num7 => ('7', '&'),
            Num8 => ('8', '*'),
            Num9 => ('9', '('),
            Num0 => ('0', ')'),
            Minus => ('-', '_'),
            Equal => ('=', '+'),
            LeftBracket => ('[', '{'),
            RightBracket => (']', '}'),
            Semicolon => (';', ':'),
            Apostrophe => ('\'', '"'),
            GraveAccent => ('`', '~'),
            Backslash => ('\\', '|'),
            Comma => (',', '<'),
            Period => ('.', '>'),
            Slash => ('/', '?'),
            _ => {
                let letter = self.letter()?;
                return Some(if shift {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                });
            }
        };
        Some(if shift { shifted } else { plain })
    }

    /// The key that types `c`, and whether shift is needed for it.
    pub fn from_char(c: char) -> Option<(Self, bool)> {
        if c == ' ' {
            return Some((PhysicalKey::Space, false));
        }
        Self::ALL.iter().copied().find_map(|key| {
            if key.char(false) == Some(c) {
                Some((key, false))
            } else if key.char(true) == Some(c) {
                Some((key, true))
            } else {
                None
            }
        })
    }

    fn letter(self) -> Option<char> {
        use PhysicalKey::*;
        Some(match self {
            A => 'a',
            B => 'b',
            C => 'c',
            D => 'd',
            E => 'e',
            F => 'f',
            G => 'g',
            H => 'h',
            I => 'i',
            J => 'j',
            K => 'k',
            L => 'l',
            M => 'm',
            N => 'n',
            O => 'o',
            P => 'p',
            Q => 'q',
            R => 'r',
            S => 's',
            T => 't',
            U => 'u',
            V => 'v',
            W => 'w',
            X => 'x',
            Y => 'y',
            Z => 'z',
            _ => return None,
        })
    }

    pub const ALL: [PhysicalKey; 83] = {
        use PhysicalKey::*;
        [
            Escape,
            Num1,
            Num2,
            Num3,
            Num4,
            Num5,
            Num6,
            Num7,
            Num8,
            Num9,
            Num0,
            Minus,
            Equal,
            Backspace,
            Tab,
            Q,
            W,
            E,
            R,
            T,
            Y,
            U,
            I,
            O,
            P,
            LeftBracket,
            RightBracket,
            Enter,
            LeftControl,
            A,
            S,
            D,
            F,
            G,
            H,
            J,
            K,
            L,
            Semicolon,
            Apostrophe,
            GraveAccent,
            LeftShift,
            Backslash,
            Z,
            X,
            C,
            V,
            B,
            N,
            M,
            Comma,
            Period,
            Slash,
            RightShift,
            LeftAlt,
            Space,
            CapsLock,
            F1,
            F2,
            F3,
            F4,
            F5,
            F6,
            F7,
            F8,
            F9,
            F10,
            F11,
            F12,
            Home,
            PageUp,
            End,
            PageDown,
            Insert,
            Delete,
            RightControl,
            RightAlt,
            ScrollLock,
            Left,
            Right,
            Up,
            Down,
            NumpadEnter,
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_unique_and_in_range() {
        let mut seen = std::collections::BTreeSet::new();
        for key in PhysicalKey::ALL {
            if let Some(index) = key.index() {
                assert!(index < KEY_INDEX_COUNT, "{key:?} out of range");
                assert!(seen.insert(index), "{key:?} shares index {index}");
                assert_eq!(PhysicalKey::from_index(index), Some(key));
            }
        }
    }

    #[test]
    fn modifier_partners_are_symmetric() {
        for key in PhysicalKey::ALL {
            if let Some(partner) = key.modifier_partner() {
                assert_eq!(partner.modifier_partner(), Some(key));
            }
        }
        assert_eq!(PhysicalKey::A.modifier_partner(), None);
    }

    #[test]
    fn char_honors_shift() {
        assert_eq!(PhysicalKey::A.char(false), Some('a'));
        assert_eq!(PhysicalKey::A.char(true), Some('A'));
        assert_eq!(PhysicalKey::Num2.char(true), Some('@'));
        assert_eq!(PhysicalKey::F1.char(false), None);
    }

    #[test]
    fn from_char_reports_shift() {
        assert_eq!(PhysicalKey::from_char('Q'), Some((PhysicalKey::Q, true)));
        assert_eq!(PhysicalKey::from_char(';'), Some((PhysicalKey::Semicolon, false)));
        assert_eq!(PhysicalKey::from_char('é'), None);
    }
}
