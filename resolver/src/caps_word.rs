use rustc_hash::FxHashSet as HashSet;

use crate::key_code::{KeyCode, Mods};

#[derive(Debug)]
pub(crate) struct CapsWordState {
    /// Keys that get `lsft` added to the active keys while they are the most
    /// recently pressed key.
    keys_to_capitalize: HashSet<KeyCode>,
    /// Keys that do not end caps word but are sent unshifted.
    keys_nonterminal: HashSet<KeyCode>,
    timeout: u16,
    /// Caps word ends once time reaches this without a qualifying key press.
    deadline: u64,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum CapsWordNextState {
    Active,
    End,
}

use CapsWordNextState::*;

impl CapsWordState {
    pub(crate) fn new(timeout: u16, now: u64) -> Self {
        let mut keys_to_capitalize: HashSet<KeyCode> =
            KeyCode::ALL.iter().copied().filter(|kc| kc.is_letter()).collect();
        keys_to_capitalize.insert(KeyCode::Minus);
        let mut keys_nonterminal: HashSet<KeyCode> =
            KeyCode::ALL.iter().copied().filter(|kc| kc.is_digit()).collect();
        keys_nonterminal.extend([KeyCode::BSpace, KeyCode::Delete]);
        Self {
            keys_to_capitalize,
            keys_nonterminal,
            timeout,
            deadline: now + u64::from(timeout),
        }
    }

    /// Classifies the key codes of one press. Modifier-only presses leave the
    /// state untouched. A shifted key only continues the word if it is `_`.
    pub(crate) fn press(&mut self, kcs: &[KeyCode], now: u64) -> CapsWordNextState {
        let shifted = Mods::from_keys(kcs.iter().copied()).intersects(Mods::SHIFT);
        let mut non_mods = kcs.iter().filter(|kc| !kc.is_modifier()).peekable();
        if non_mods.peek().is_none() {
            return Active;
        }
        let continues = non_mods.all(|kc| {
            if shifted {
                *kc == KeyCode::Minus
            } else {
                self.keys_to_capitalize.contains(kc) || self.keys_nonterminal.contains(kc)
            }
        });
        if !continues {
            log::debug!("caps-word ended by {kcs:?}");
            return End;
        }
        self.deadline = now + u64::from(self.timeout);
        Active
    }

    pub(crate) fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline
    }

    pub(crate) fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Adds `lsft` to the active keys if the newest non-modifier key is one
    /// that caps word capitalizes.
    pub(crate) fn maybe_add_lsft(&self, active_keys: &mut Vec<KeyCode>) {
        let capitalize = active_keys
            .iter()
            .rev()
            .find(|kc| !kc.is_modifier())
            .map(|kc| self.keys_to_capitalize.contains(kc))
            .unwrap_or(false);
        if capitalize && !active_keys.contains(&KeyCode::LShift) {
            active_keys.insert(0, KeyCode::LShift);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::key_code::KeyCode::*;
    use CapsWordNextState::End;

    #[test]
    fn letters_and_minus_are_capitalized() {
        let cw = CapsWordState::new(2000, 0);
        let mut keys = vec![A];
        cw.maybe_add_lsft(&mut keys);
        assert_eq!(vec![LShift, A], keys);
        let mut keys = vec![Minus];
        cw.maybe_add_lsft(&mut keys);
        assert_eq!(vec![LShift, Minus], keys);
        let mut keys = vec![A, Kb1];
        cw.maybe_add_lsft(&mut keys);
        assert_eq!(vec![A, Kb1], keys);
    }

    #[test]
    fn word_boundaries() {
        let mut cw = CapsWordState::new(2000, 0);
        assert_eq!(Active, cw.press(&[A], 10));
        assert_eq!(Active, cw.press(&[Kb5], 20));
        assert_eq!(Active, cw.press(&[BSpace], 30));
        assert_eq!(Active, cw.press(&[LShift, Minus], 40));
        assert_eq!(Active, cw.press(&[LCtrl], 50));
        assert_eq!(End, cw.press(&[LShift, Kb9], 60));
        assert_eq!(End, cw.press(&[Space], 70));
    }

    #[test]
    fn idle_timeout_restarts_on_each_key() {
        let mut cw = CapsWordState::new(2000, 0);
        assert!(!cw.is_expired(1999));
        cw.press(&[A], 1500);
        assert!(!cw.is_expired(3000));
        assert!(cw.is_expired(3500));
        cw.press(&[RShift], 3400);
        assert_eq!(3500, cw.deadline());
    }
}
