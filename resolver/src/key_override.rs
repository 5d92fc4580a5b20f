//! Modifier-conditioned key substitution.

use crate::key_code::{KeyCode, Mods};

/// While any of `trigger_mods` is held together with `trigger`, the host sees
/// `replacement` instead, with the triggering modifiers lifted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyOverride {
    pub trigger_mods: Mods,
    pub trigger: KeyCode,
    pub replacement: KeyCode,
}

impl KeyOverride {
    pub const fn basic(trigger_mods: Mods, trigger: KeyCode, replacement: KeyCode) -> Self {
        Self {
            trigger_mods,
            trigger,
            replacement,
        }
    }

    /// Shift + Backspace sends Delete.
    pub const fn shift_backspace_delete() -> Self {
        Self::basic(Mods::SHIFT, KeyCode::BSpace, KeyCode::Delete)
    }
}

/// Rewrites the active key set in place. The set is recomputed from scratch
/// on every change, so an override stops applying as soon as either the
/// modifier or the key is released.
pub(crate) fn override_keys(overrides: &[KeyOverride], keys: &mut Vec<KeyCode>) {
    for ovd in overrides {
        let mods = Mods::from_keys(keys.iter().copied());
        if !mods.intersects(ovd.trigger_mods) {
            continue;
        }
        let Some(pos) = keys.iter().position(|kc| *kc == ovd.trigger) else {
            continue;
        };
        log::trace!("override {:?} -> {:?}", ovd.trigger, ovd.replacement);
        keys[pos] = ovd.replacement;
        keys.retain(|kc| !kc.as_mods().intersects(ovd.trigger_mods));
    }
}
