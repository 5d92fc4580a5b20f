//! Timing values, named key sets and the per-board strategy hooks.

use rustc_hash::FxHashSet as HashSet;

use crate::action::{HoldTapAction, LayerId};
use crate::combo::ComboSpec;
use crate::event::{KCoord, COMBO_ROW};
use crate::key_code::{KeyCode, Mods};
use crate::key_override::KeyOverride;
use crate::layers::{LayerState, TriLayer};
use crate::leader::LeaderSequence;

/// The side of the keyboard a key belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
    /// Keys that belong to neither side, e.g. on a macropad.
    Any,
}

impl Hand {
    /// Returns `true` if a key on `other` counts as the opposite hand.
    /// [`Hand::Any`] is opposite to everything.
    pub fn opposes(self, other: Hand) -> bool {
        match (self, other) {
            (Hand::Any, _) | (_, Hand::Any) => true,
            (a, b) => a != b,
        }
    }
}

/// Combo windows, in milliseconds, per timing tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ComboTerms {
    pub fast: u16,
    pub medium: u16,
    pub slow: u16,
}

impl Default for ComboTerms {
    fn default() -> Self {
        Self {
            fast: 18,
            medium: 30,
            slow: 50,
        }
    }
}

/// All timing and threshold values of the resolver.
///
/// Per-key decision windows are not kept here: they are baked into each
/// [`HoldTapAction`] when a board builds its layers.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Default dual-role decision window.
    pub tapping_term: u16,
    /// Pressing a dual-role key again within this long of releasing it as a
    /// tap is a tap. `None` or `Some(0)` disables it.
    pub quick_tap_term: Option<u16>,
    pub permissive_hold: bool,
    pub chordal_hold: bool,
    /// Flow tap window. 0 disables flow tap.
    pub flow_tap_term: u16,
    pub flow_tap_keys: HashSet<KeyCode>,
    /// Flow tap is off while any of these is held.
    pub flow_tap_blocking_mods: Mods,
    /// Tap key codes of dual-role keys that may still resolve as hold when a
    /// key on the same hand is pressed.
    pub same_hand_hold_keys: HashSet<KeyCode>,
    pub combo_terms: ComboTerms,
    /// How long must-tap and must-hold combos wait for their members.
    pub combo_hold_term: u16,
    pub tri_layer: Option<TriLayer>,
    pub caps_word_idle_timeout: u16,
    pub both_shifts_caps_word: bool,
    pub num_word_layer: LayerId,
    pub num_word_idle_timeout: u16,
    pub one_shot_timeout: Option<u16>,
    /// Tapping a one-shot modifier this many times in a row locks it.
    pub one_shot_tap_toggle: Option<u8>,
    /// Per-key leader timeout.
    pub leader_timeout: u16,
    pub leader_sequences: Vec<LeaderSequence>,
    pub key_overrides: Vec<KeyOverride>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        use KeyCode::*;
        let mut flow_tap_keys: HashSet<KeyCode> =
            KeyCode::ALL.iter().copied().filter(|kc| kc.is_letter()).collect();
        flow_tap_keys.extend([Dot, Comma, SColon, Slash]);
        Self {
            tapping_term: 125,
            quick_tap_term: Some(125),
            permissive_hold: true,
            chordal_hold: true,
            flow_tap_term: 150,
            flow_tap_keys,
            flow_tap_blocking_mods: Mods::CTRL | Mods::GUI | Mods::LALT,
            same_hand_hold_keys: [Space, Enter].into_iter().collect(),
            combo_terms: ComboTerms::default(),
            combo_hold_term: 125,
            tri_layer: Some(TriLayer {
                lower: 2,
                raise: 3,
                adjust: 5,
            }),
            caps_word_idle_timeout: 2000,
            both_shifts_caps_word: true,
            num_word_layer: 2,
            num_word_idle_timeout: 3000,
            one_shot_timeout: None,
            one_shot_tap_toggle: None,
            leader_timeout: 300,
            leader_sequences: vec![],
            key_overrides: vec![KeyOverride::shift_backspace_delete()],
        }
    }
}

/// The hand of `coord`. Virtual combo keys belong to no hand.
pub fn hand_of<H: ResolverHooks + ?Sized>(hooks: &H, coord: KCoord) -> Hand {
    if coord.0 == COMBO_ROW {
        Hand::Any
    } else {
        hooks.hand(coord)
    }
}

/// Board-specific decisions, injected when a resolver is built.
///
/// Only [`hand`](ResolverHooks::hand) is required; the other methods default
/// to the behaviour driven by [`ResolverConfig`].
pub trait ResolverHooks {
    /// The side of the keyboard a physical key is on.
    fn hand(&self, coord: KCoord) -> Hand;

    /// Whether the dual-role key at `tap_hold` may still become a hold when
    /// `other` is pressed. Returning `false` settles it as a tap.
    fn chordal_hold(
        &self,
        cfg: &ResolverConfig,
        tap_hold: KCoord,
        action: &HoldTapAction,
        other: KCoord,
    ) -> bool {
        if action
            .tap_keycode()
            .is_some_and(|kc| cfg.same_hand_hold_keys.contains(&kc))
        {
            return true;
        }
        hand_of(self, tap_hold).opposes(hand_of(self, other))
    }

    fn is_flow_tap_key(&self, cfg: &ResolverConfig, key: KeyCode, mods: Mods) -> bool {
        !mods.intersects(cfg.flow_tap_blocking_mods) && cfg.flow_tap_keys.contains(&key)
    }

    /// The flow tap window for `key` pressed right after `prev`; 0 disables it.
    fn flow_tap_term(
        &self,
        cfg: &ResolverConfig,
        key: Option<KeyCode>,
        prev: Option<KeyCode>,
        mods: Mods,
    ) -> u16 {
        match (key, prev) {
            (Some(key), Some(prev))
                if self.is_flow_tap_key(cfg, key, mods) && self.is_flow_tap_key(cfg, prev, mods) =>
            {
                cfg.flow_tap_term
            }
            _ => 0,
        }
    }

    fn combo_should_trigger(&self, combo: &ComboSpec, layers: &LayerState) -> bool {
        combo.layers.allows(layers)
    }
}

impl<T: ResolverHooks + ?Sized> ResolverHooks for Box<T> {
    fn hand(&self, coord: KCoord) -> Hand {
        (**self).hand(coord)
    }

    fn chordal_hold(
        &self,
        cfg: &ResolverConfig,
        tap_hold: KCoord,
        action: &HoldTapAction,
        other: KCoord,
    ) -> bool {
        (**self).chordal_hold(cfg, tap_hold, action, other)
    }

    fn is_flow_tap_key(&self, cfg: &ResolverConfig, key: KeyCode, mods: Mods) -> bool {
        (**self).is_flow_tap_key(cfg, key, mods)
    }

    fn flow_tap_term(
        &self,
        cfg: &ResolverConfig,
        key: Option<KeyCode>,
        prev: Option<KeyCode>,
        mods: Mods,
    ) -> u16 {
        (**self).flow_tap_term(cfg, key, prev, mods)
    }

    fn combo_should_trigger(&self, combo: &ComboSpec, layers: &LayerState) -> bool {
        (**self).combo_should_trigger(combo, layers)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::{lt, mt};
    use crate::key_code::KeyCode::*;

    struct Split;

    impl ResolverHooks for Split {
        fn hand(&self, (_, col): KCoord) -> Hand {
            if col < 5 {
                Hand::Left
            } else {
                Hand::Right
            }
        }
    }

    fn ht(action: crate::action::LogicalAction) -> HoldTapAction {
        match action {
            crate::action::LogicalAction::HoldTap(ht) => *ht,
            _ => unreachable!(),
        }
    }

    #[test]
    fn chordal_hold_by_hand() {
        let cfg = ResolverConfig::default();
        let f = ht(mt(LShift, F, 185));
        assert!(!Split.chordal_hold(&cfg, (1, 3), &f, (0, 2)));
        assert!(Split.chordal_hold(&cfg, (1, 3), &f, (0, 7)));
        assert!(Split.chordal_hold(&cfg, (1, 3), &f, (COMBO_ROW, 2)));
        let space = ht(lt(3, Space, 125));
        assert!(Split.chordal_hold(&cfg, (3, 3), &space, (0, 2)));
    }

    #[test]
    fn flow_tap_needs_two_fast_keys_and_no_hotkey_mods() {
        let cfg = ResolverConfig::default();
        let none = Mods::empty();
        assert_eq!(150, Split.flow_tap_term(&cfg, Some(F), Some(E), none));
        assert_eq!(150, Split.flow_tap_term(&cfg, Some(A), Some(Comma), Mods::LSHIFT));
        assert_eq!(0, Split.flow_tap_term(&cfg, Some(F), Some(Space), none));
        assert_eq!(0, Split.flow_tap_term(&cfg, Some(F), None, none));
        assert_eq!(0, Split.flow_tap_term(&cfg, Some(F), Some(E), Mods::LCTRL));
        assert_eq!(0, Split.flow_tap_term(&cfg, Some(F), Some(E), Mods::LALT));
        assert_eq!(150, Split.flow_tap_term(&cfg, Some(F), Some(E), Mods::RALT));
    }

    #[test]
    fn hands() {
        assert!(Hand::Left.opposes(Hand::Right));
        assert!(!Hand::Right.opposes(Hand::Right));
        assert!(Hand::Any.opposes(Hand::Any));
    }
}
