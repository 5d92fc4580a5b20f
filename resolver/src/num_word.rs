//! Num word: a layer that stays on for one number.

use crate::action::LayerId;
use crate::key_code::KeyCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumWordState {
    pub(crate) layer: LayerId,
    timeout: u16,
    deadline: u64,
}

/// Keys typed as part of a number.
pub(crate) fn continues_number(kc: KeyCode) -> bool {
    use KeyCode::*;
    kc.is_digit()
        || kc.is_keypad()
        || matches!(kc, Dot | Comma | Minus | Equal | Slash | BSpace | Delete)
}

impl NumWordState {
    pub(crate) fn new(layer: LayerId, timeout: u16, now: u64) -> Self {
        Self {
            layer,
            timeout,
            deadline: now + u64::from(timeout),
        }
    }

    /// Returns `false` if the press ends the number. Presses made only of
    /// modifiers are neutral; shifted digits cover `+` and `*`.
    pub(crate) fn press(&mut self, kcs: &[KeyCode], now: u64) -> bool {
        let mut non_mods = kcs.iter().copied().filter(|kc| !kc.is_modifier()).peekable();
        if non_mods.peek().is_none() {
            return true;
        }
        if !non_mods.all(continues_number) {
            log::debug!("num-word ended by {kcs:?}");
            return false;
        }
        self.deadline = now + u64::from(self.timeout);
        true
    }

    pub(crate) fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline
    }

    pub(crate) fn deadline(&self) -> u64 {
        self.deadline
    }
}
