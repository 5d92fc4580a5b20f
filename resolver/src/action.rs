//! The different actions that can be bound to a key position.

use crate::key_code::KeyCode;

/// Index of a layer in a [`LayerTable`](crate::layers::LayerTable).
pub type LayerId = u8;

/// How a layer action changes the layer state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerMode {
    /// Active while the key is held.
    Momentary,
    /// Flips the layer on each press.
    Toggle,
    /// Deactivates every other layer and activates this one.
    Move,
    /// Active for the next key press only.
    OneShot,
}

/// Actions that only make sense to the host firmware.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SystemAction {
    /// Jump to the bootloader (`QK_BOOT`).
    Bootloader,
    /// Clear persistent settings (`EE_CLR`).
    EepromClear,
    /// Toggle N-key rollover reporting (`NK_TOGG`).
    NkroToggle,
}

/// Actions handled by the resolver itself rather than sent as key codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CustomAction {
    CapsWordToggle,
    NumWordToggle,
    /// Start a leader sequence.
    Leader,
    System(SystemAction),
}

/// One step of a macro.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MacroStep {
    Press(KeyCode),
    Release(KeyCode),
    Tap(KeyCode),
    /// Arms a one-shot modifier once the preceding steps are sent.
    OneShot(KeyCode),
}

/// A dual-role key: one action on tap, another on hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HoldTapAction {
    /// The decision window in milliseconds. A key held longer than this
    /// without any other deciding event resolves as hold.
    pub timeout: u16,
    /// The action used when the key resolves as tap.
    pub tap: LogicalAction,
    /// The action used when the key resolves as hold.
    pub hold: LogicalAction,
}

impl HoldTapAction {
    /// The key code sent on tap, if the tap action sends one.
    pub fn tap_keycode(&self) -> Option<KeyCode> {
        self.tap.tap_keycode()
    }

    /// Returns `true` if the hold action activates a layer.
    pub fn is_layer_tap(&self) -> bool {
        matches!(self.hold, LogicalAction::Layer(..))
    }
}

/// The action bound to a key position on a layer.
///
/// Values are built once when a keymap is loaded and are never modified
/// afterwards; resolution works generically over the variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LogicalAction {
    /// Does nothing.
    #[default]
    NoOp,
    /// Falls through to the next active layer below.
    Trans,
    /// Sends a key code, modifiers included, while held.
    KeyCode(KeyCode),
    /// Sends several key codes at once while held, e.g. `LShift` + `Kb9` for `(`.
    MultipleKeyCodes(Box<[KeyCode]>),
    /// Changes the layer state.
    Layer(LayerId, LayerMode),
    /// A modifier applied to the next key press only.
    OneShotMod(KeyCode),
    /// Taps a fixed sequence of keys on press.
    Macro(Box<[MacroStep]>),
    /// A dual-role key.
    HoldTap(Box<HoldTapAction>),
    Custom(CustomAction),
}

impl LogicalAction {
    /// The key code this action would type, used for flow tap and
    /// same-hand exemption lookups.
    pub fn tap_keycode(&self) -> Option<KeyCode> {
        match self {
            LogicalAction::KeyCode(kc) => Some(*kc),
            LogicalAction::MultipleKeyCodes(kcs) => {
                kcs.iter().rev().find(|kc| !kc.is_modifier()).copied()
            }
            LogicalAction::HoldTap(ht) => ht.tap_keycode(),
            _ => None,
        }
    }

    pub fn is_hold_tap(&self) -> bool {
        matches!(self, LogicalAction::HoldTap(_))
    }
}

/// A shortcut to create a `LogicalAction::KeyCode`.
pub const fn k(kc: KeyCode) -> LogicalAction {
    LogicalAction::KeyCode(kc)
}

/// A key code sent together with left shift, e.g. `s(Kb1)` for `!`.
pub fn s(kc: KeyCode) -> LogicalAction {
    LogicalAction::MultipleKeyCodes(Box::new([KeyCode::LShift, kc]))
}

/// Momentary layer (`MO`).
pub const fn mo(layer: LayerId) -> LogicalAction {
    LogicalAction::Layer(layer, LayerMode::Momentary)
}

/// Toggle layer (`TG`).
pub const fn tg(layer: LayerId) -> LogicalAction {
    LogicalAction::Layer(layer, LayerMode::Toggle)
}

/// Move to layer (`TO`).
pub const fn to(layer: LayerId) -> LogicalAction {
    LogicalAction::Layer(layer, LayerMode::Move)
}

/// One-shot layer (`OSL`).
pub const fn osl(layer: LayerId) -> LogicalAction {
    LogicalAction::Layer(layer, LayerMode::OneShot)
}

/// One-shot modifier (`OSM`).
pub const fn osm(modifier: KeyCode) -> LogicalAction {
    LogicalAction::OneShotMod(modifier)
}

/// Mod-tap: `tap` on tap, `modifier` on hold.
pub fn mt(modifier: KeyCode, tap: KeyCode, timeout: u16) -> LogicalAction {
    LogicalAction::HoldTap(Box::new(HoldTapAction {
        timeout,
        tap: k(tap),
        hold: k(modifier),
    }))
}

/// Layer-tap: `tap` on tap, momentary `layer` on hold.
pub fn lt(layer: LayerId, tap: KeyCode, timeout: u16) -> LogicalAction {
    LogicalAction::HoldTap(Box::new(HoldTapAction {
        timeout,
        tap: k(tap),
        hold: mo(layer),
    }))
}

/// A macro built from explicit steps.
pub fn steps(steps: &[MacroStep]) -> LogicalAction {
    LogicalAction::Macro(steps.into())
}

/// A macro typing `text` on a US layout, followed by `tail`.
///
/// Characters with no key on a US layout are skipped.
pub fn text_then(text: &str, tail: &[MacroStep]) -> LogicalAction {
    let mut out = text_steps(text);
    out.extend_from_slice(tail);
    LogicalAction::Macro(out.into_boxed_slice())
}

/// A macro typing `text` on a US layout.
pub fn text(text: &str) -> LogicalAction {
    text_then(text, &[])
}

/// Converts `text` to the press/tap/release steps that type it.
pub fn text_steps(text: &str) -> Vec<MacroStep> {
    let mut out = Vec::with_capacity(text.len() * 3);
    for c in text.chars() {
        match ascii_key(c) {
            Some((kc, false)) => out.push(MacroStep::Tap(kc)),
            Some((kc, true)) => {
                out.push(MacroStep::Press(KeyCode::LShift));
                out.push(MacroStep::Tap(kc));
                out.push(MacroStep::Release(KeyCode::LShift));
            }
            None => log::warn!("no US key for {c:?}, skipping it in macro"),
        }
    }
    out
}

/// The US-layout key for an ASCII character and whether it needs shift.
pub fn ascii_key(c: char) -> Option<(KeyCode, bool)> {
    use KeyCode::*;
    const LETTERS: [KeyCode; 26] = [
        A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    ];
    const DIGITS: [KeyCode; 10] = [Kb0, Kb1, Kb2, Kb3, Kb4, Kb5, Kb6, Kb7, Kb8, Kb9];
    Some(match c {
        'a'..='z' => (LETTERS[c as usize - 'a' as usize], false),
        'A'..='Z' => (LETTERS[c as usize - 'A' as usize], true),
        '0'..='9' => (DIGITS[c as usize - '0' as usize], false),
        '!' => (Kb1, true),
        '@' => (Kb2, true),
        '#' => (Kb3, true),
        '$' => (Kb4, true),
        '%' => (Kb5, true),
        '^' => (Kb6, true),
        '&' => (Kb7, true),
        '*' => (Kb8, true),
        '(' => (Kb9, true),
        ')' => (Kb0, true),
        ' ' => (Space, false),
        '\n' => (Enter, false),
        '\t' => (Tab, false),
        '-' => (Minus, false),
        '_' => (Minus, true),
        '=' => (Equal, false),
        '+' => (Equal, true),
        '[' => (LBracket, false),
        '{' => (LBracket, true),
        ']' => (RBracket, false),
        '}' => (RBracket, true),
        '\\' => (Bslash, false),
        '|' => (Bslash, true),
        ';' => (SColon, false),
        ':' => (SColon, true),
        '\'' => (Quote, false),
        '"' => (Quote, true),
        '`' => (Grave, false),
        '~' => (Grave, true),
        ',' => (Comma, false),
        '<' => (Comma, true),
        '.' => (Dot, false),
        '>' => (Dot, true),
        '/' => (Slash, false),
        '?' => (Slash, true),
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::MacroStep::*;
    use super::*;
    use crate::key_code::KeyCode::*;

    #[test]
    fn text_macro_shifts_only_what_needs_it() {
        assert_eq!(
            vec![
                Press(LShift),
                Tap(SColon),
                Release(LShift),
                Tap(Equal)
            ],
            text_steps(":=")
        );
        assert_eq!(vec![Tap(Minus), Press(LShift), Tap(Dot), Release(LShift)], text_steps("->"));
    }

    #[test]
    fn ascii_digits_and_letters() {
        assert_eq!(Some((Kb7, false)), ascii_key('7'));
        assert_eq!(Some((Q, true)), ascii_key('Q'));
        assert_eq!(Some((Grave, true)), ascii_key('~'));
        assert_eq!(None, ascii_key('é'));
    }

    #[test]
    fn tap_keycode_of_dual_role_and_shifted_keys() {
        assert_eq!(Some(F), mt(LShift, F, 185).tap_keycode());
        assert_eq!(Some(Space), lt(3, Space, 125).tap_keycode());
        assert_eq!(Some(Kb9), s(Kb9).tap_keycode());
        assert_eq!(None, mo(2).tap_keycode());
        assert!(lt(3, Space, 125).is_hold_tap());
    }
}
