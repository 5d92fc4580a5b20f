//! Key code definitions.
//!
//! The names follow the USB HID usage tables in shortened form (`BSpace`,
//! `SColon`, `PgDown`, ...). Every key code also carries a short lowercase
//! name used by simulation scripts and logs.

use bitflags::bitflags;

macro_rules! key_codes {
    ($($(#[$meta:meta])* $kc:ident => $name:literal $(| $alias:literal)*,)*) => {
        /// A key code as sent to the host.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum KeyCode {
            $($(#[$meta])* $kc,)*
        }

        impl KeyCode {
            /// Every key code, in declaration order.
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$kc,)*];

            /// The canonical short name of this key code.
            pub fn name(self) -> &'static str {
                match self {
                    $(KeyCode::$kc => $name,)*
                }
            }

            /// Parses a short name or one of its aliases. Matching ignores ASCII case.
            pub fn from_name(s: &str) -> Option<Self> {
                let lower = s.to_ascii_lowercase();
                match lower.as_str() {
                    $($name $(| $alias)* => Some(KeyCode::$kc),)*
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    A => "a", B => "b", C => "c", D => "d", E => "e", F => "f", G => "g",
    H => "h", I => "i", J => "j", K => "k", L => "l", M => "m", N => "n",
    O => "o", P => "p", Q => "q", R => "r", S => "s", T => "t", U => "u",
    V => "v", W => "w", X => "x", Y => "y", Z => "z",
    Kb1 => "1", Kb2 => "2", Kb3 => "3", Kb4 => "4", Kb5 => "5",
    Kb6 => "6", Kb7 => "7", Kb8 => "8", Kb9 => "9", Kb0 => "0",
    Enter => "ent" | "enter" | "ret",
    Escape => "esc",
    BSpace => "bspc" | "backspace",
    Tab => "tab",
    Space => "spc" | "space",
    Minus => "min" | "-",
    Equal => "eql" | "=",
    LBracket => "lbrc" | "[",
    RBracket => "rbrc" | "]",
    Bslash => "bsls" | "\\",
    SColon => "scln" | ";",
    Quote => "quot" | "'",
    Grave => "grv" | "`",
    Comma => "comm" | ",",
    Dot => "dot" | ".",
    Slash => "slsh" | "/",
    CapsLock => "caps",
    F1 => "f1", F2 => "f2", F3 => "f3", F4 => "f4", F5 => "f5", F6 => "f6",
    F7 => "f7", F8 => "f8", F9 => "f9", F10 => "f10", F11 => "f11", F12 => "f12",
    PScreen => "pscr",
    Insert => "ins",
    Home => "home",
    PgUp => "pgup",
    Delete => "del",
    End => "end",
    PgDown => "pgdn",
    Right => "rght" | "right",
    Left => "left",
    Down => "down",
    Up => "up",
    NumLock => "num" | "nlck",
    KpSlash => "kp/",
    KpAsterisk => "kp*",
    KpMinus => "kp-",
    KpPlus => "kp+",
    KpEnter => "kprt",
    Kp1 => "kp1", Kp2 => "kp2", Kp3 => "kp3", Kp4 => "kp4", Kp5 => "kp5",
    Kp6 => "kp6", Kp7 => "kp7", Kp8 => "kp8", Kp9 => "kp9", Kp0 => "kp0",
    KpDot => "kp.",
    Mute => "mute",
    VolUp => "volu",
    VolDown => "vold",
    MediaPreviousSong => "prev",
    MediaPlayPause => "pp",
    MediaNextSong => "next",
    MediaStop => "stop",
    MsUp => "ms_up",
    MsDown => "ms_down",
    MsLeft => "ms_left",
    MsRight => "ms_rght",
    MsWheelUp => "ms_whlu",
    MsWheelDown => "ms_whld",
    MsWheelLeft => "ms_whll",
    MsWheelRight => "ms_whlr",
    MsBtn1 => "ms_btn1",
    MsBtn2 => "ms_btn2",
    MsBtn3 => "ms_btn3",
    MsAccel0 => "ms_acl0",
    MsAccel1 => "ms_acl1",
    MsAccel2 => "ms_acl2",
    LCtrl => "lctl",
    LShift => "lsft",
    LAlt => "lalt",
    LGui => "lgui" | "lmet",
    RCtrl => "rctl",
    RShift => "rsft",
    RAlt => "ralt",
    RGui => "rgui" | "rmet",
}

bitflags! {
    /// Modifier state, laid out like the HID report modifier byte.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u8 {
        const LCTRL = 0x01;
        const LSHIFT = 0x02;
        const LALT = 0x04;
        const LGUI = 0x08;
        const RCTRL = 0x10;
        const RSHIFT = 0x20;
        const RALT = 0x40;
        const RGUI = 0x80;

        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const CTRL = Self::LCTRL.bits() | Self::RCTRL.bits();
        const GUI = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

impl Mods {
    /// Collects the modifier bits of every modifier key in `keys`.
    pub fn from_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        keys.into_iter()
            .fold(Mods::empty(), |acc, kc| acc | kc.as_mods())
    }
}

impl KeyCode {
    /// Returns `true` for the eight modifier keys.
    pub fn is_modifier(self) -> bool {
        !self.as_mods().is_empty()
    }

    /// The modifier bit of this key, empty for non-modifiers.
    pub fn as_mods(self) -> Mods {
        use KeyCode::*;
        match self {
            LCtrl => Mods::LCTRL,
            LShift => Mods::LSHIFT,
            LAlt => Mods::LALT,
            LGui => Mods::LGUI,
            RCtrl => Mods::RCTRL,
            RShift => Mods::RSHIFT,
            RAlt => Mods::RALT,
            RGui => Mods::RGUI,
            _ => Mods::empty(),
        }
    }

    pub fn is_letter(self) -> bool {
        (KeyCode::A..=KeyCode::Z).contains(&self)
    }

    pub fn is_digit(self) -> bool {
        (KeyCode::Kb1..=KeyCode::Kb0).contains(&self)
    }

    pub fn is_keypad(self) -> bool {
        (KeyCode::KpSlash..=KeyCode::KpDot).contains(&self)
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod test {
    use super::KeyCode::{self, *};
    use super::Mods;

    #[test]
    fn names_round_trip_through_aliases() {
        assert_eq!(Some(Space), KeyCode::from_name("spc"));
        assert_eq!(Some(Space), KeyCode::from_name("SPACE"));
        assert_eq!(Some(SColon), KeyCode::from_name(";"));
        assert_eq!(Some(Kb0), KeyCode::from_name("0"));
        assert_eq!(None, KeyCode::from_name("hyper"));
        for kc in KeyCode::ALL {
            assert_eq!(Some(*kc), KeyCode::from_name(kc.name()), "{kc:?}");
        }
    }

    #[test]
    fn key_classes() {
        assert!(A.is_letter() && Z.is_letter() && !Kb1.is_letter());
        assert!(Kb1.is_digit() && Kb0.is_digit() && !Kp1.is_digit());
        assert!(Kp1.is_keypad() && KpDot.is_keypad() && !Kb5.is_keypad());
        assert!(RGui.is_modifier() && !Space.is_modifier());
    }

    #[test]
    fn mods_from_keys() {
        let mods = Mods::from_keys([LShift, A, RCtrl]);
        assert_eq!(Mods::LSHIFT | Mods::RCTRL, mods);
        assert!(mods.intersects(Mods::SHIFT));
        assert!(!mods.intersects(Mods::GUI));
    }
}
