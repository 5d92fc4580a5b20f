//! Layer tables and the layer composer.

use crate::action::{LayerId, LogicalAction};
use crate::error::ConfigError;
use crate::event::KCoord;
use crate::key_code::KeyCode;

/// The base layer. It is always active and cannot be deactivated.
pub const BASE: LayerId = 0;

/// Layer state is a 32 bit set, so a keymap holds at most this many layers.
pub const MAX_LAYERS: usize = 32;

pub(crate) static NO_OP: LogicalAction = LogicalAction::NoOp;

/// One layer: rows of actions indexed by `(row, column)`.
pub type Layer = Vec<Vec<LogicalAction>>;

/// The layers of one keyboard, indexed by [`LayerId`]. Immutable once built.
#[derive(Debug, Clone)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    /// Builds a table, checking that every layer has the shape of the base
    /// layer and that layer actions only refer to layers that exist.
    pub fn new(layers: Vec<Layer>) -> Result<Self, ConfigError> {
        let Some(base) = layers.first() else {
            return Err(ConfigError::NoLayers);
        };
        if layers.len() > MAX_LAYERS {
            return Err(ConfigError::TooManyLayers(layers.len()));
        }
        let shape: Vec<usize> = base.iter().map(Vec::len).collect();
        for (l, layer) in layers.iter().enumerate() {
            if layer.len() != shape.len() {
                return Err(ConfigError::LayerRows {
                    layer: l,
                    expected: shape.len(),
                    found: layer.len(),
                });
            }
            for (row, (keys, expected)) in layer.iter().zip(&shape).enumerate() {
                if keys.len() != *expected {
                    return Err(ConfigError::LayerShape {
                        layer: l,
                        row,
                        expected: *expected,
                        found: keys.len(),
                    });
                }
                for (col, action) in keys.iter().enumerate() {
                    if let Some(target) = layer_target(action) {
                        if usize::from(target) >= layers.len() {
                            return Err(ConfigError::LayerOutOfRange {
                                layer: l,
                                coord: (row as u8, col as u16),
                                target,
                            });
                        }
                    }
                }
            }
        }
        Ok(Self { layers })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The entry of one layer at `coord`, if the position exists.
    pub fn get(&self, layer: LayerId, (row, col): KCoord) -> Option<&LogicalAction> {
        self.layers
            .get(usize::from(layer))?
            .get(usize::from(row))?
            .get(usize::from(col))
    }

    /// Finds the first position on the base layer bound to `action`, scanning
    /// row by row.
    pub fn find_on_base(&self, action: &LogicalAction) -> Option<KCoord> {
        self.layers[usize::from(BASE)]
            .iter()
            .enumerate()
            .find_map(|(row, keys)| {
                keys.iter()
                    .position(|a| a == action)
                    .map(|col| (row as u8, col as u16))
            })
    }

    /// Finds the first position on the base layer whose tap key code is `kc`,
    /// scanning row by row.
    pub fn find_tap_on_base(&self, kc: KeyCode) -> Option<KCoord> {
        self.layers[usize::from(BASE)]
            .iter()
            .enumerate()
            .find_map(|(row, keys)| {
                keys.iter()
                    .position(|a| a.tap_keycode() == Some(kc))
                    .map(|col| (row as u8, col as u16))
            })
    }

    /// Resolves `coord` against the active layers: the highest active layer
    /// with a non-transparent entry wins. A position that is transparent all
    /// the way down to the base layer does nothing.
    pub fn action_at(&self, coord: KCoord, state: &LayerState) -> &LogicalAction {
        state
            .active_layers()
            .filter_map(|layer| self.get(layer, coord))
            .find(|action| **action != LogicalAction::Trans)
            .unwrap_or(&NO_OP)
    }
}

fn layer_target(action: &LogicalAction) -> Option<LayerId> {
    match action {
        LogicalAction::Layer(target, _) => Some(*target),
        LogicalAction::HoldTap(ht) => layer_target(&ht.hold).or_else(|| layer_target(&ht.tap)),
        _ => None,
    }
}

/// Three layers joined by the tri-layer rule: `adjust` is active exactly
/// while both `lower` and `raise` are.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TriLayer {
    pub lower: LayerId,
    pub raise: LayerId,
    pub adjust: LayerId,
}

impl TriLayer {
    /// Applies the rule to a raw layer bit set.
    pub fn apply(&self, raw: u32) -> u32 {
        let both = bit(self.lower) | bit(self.raise);
        if raw & both == both {
            raw | bit(self.adjust)
        } else {
            raw & !bit(self.adjust)
        }
    }
}

fn bit(layer: LayerId) -> u32 {
    1u32.checked_shl(u32::from(layer)).unwrap_or(0)
}

/// The set of active layers.
///
/// Each source of activation is kept separately so that releasing one of
/// them never drops a layer another source still holds. The tri-layer rule
/// is applied when the state is read and is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerState {
    momentary: [u8; MAX_LAYERS],
    toggled: u32,
    one_shot: u32,
    locked: u32,
    tri_layer: Option<TriLayer>,
}

impl LayerState {
    pub fn new(tri_layer: Option<TriLayer>) -> Self {
        Self {
            tri_layer,
            ..Default::default()
        }
    }

    /// Active layers before the tri-layer rule. The base bit is always set.
    pub fn raw(&self) -> u32 {
        let held = self
            .momentary
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .fold(0u32, |acc, (layer, _)| acc | (1u32 << layer));
        held | self.toggled | self.one_shot | self.locked | bit(BASE)
    }

    /// Active layers as a bit set, tri-layer applied.
    pub fn bits(&self) -> u32 {
        match &self.tri_layer {
            Some(tri) => tri.apply(self.raw()),
            None => self.raw(),
        }
    }

    pub fn is_active(&self, layer: LayerId) -> bool {
        self.bits() & bit(layer) != 0
    }

    /// Layer predicate used by combos.
    ///
    /// For the base layer this is true only when no other layer is active;
    /// for any other layer it tests that layer's bit.
    pub fn layer_state_is(&self, layer: LayerId) -> bool {
        if layer == BASE {
            self.bits() == bit(BASE)
        } else {
            self.is_active(layer)
        }
    }

    /// The highest active layer.
    pub fn highest(&self) -> LayerId {
        (31 - self.bits().leading_zeros()) as LayerId
    }

    /// Active layers from the highest down to the base layer.
    pub fn active_layers(&self) -> impl Iterator<Item = LayerId> {
        let bits = self.bits();
        (0..MAX_LAYERS as LayerId)
            .rev()
            .filter(move |layer| bits & bit(*layer) != 0)
    }

    pub fn press_momentary(&mut self, layer: LayerId) {
        if let Some(count) = self.momentary.get_mut(usize::from(layer)) {
            *count = count.saturating_add(1);
        }
    }

    pub fn release_momentary(&mut self, layer: LayerId) {
        if let Some(count) = self.momentary.get_mut(usize::from(layer)) {
            *count = count.saturating_sub(1);
        }
    }

    /// Flips a toggled layer. Toggling the base layer clears every toggled layer.
    pub fn toggle(&mut self, layer: LayerId) {
        if layer == BASE {
            self.toggled = 0;
        } else {
            self.toggled ^= bit(layer);
        }
    }

    /// Deactivates every layer, then activates `layer`.
    pub fn move_to(&mut self, layer: LayerId) {
        self.momentary = [0; MAX_LAYERS];
        self.one_shot = 0;
        self.locked = 0;
        self.toggled = if layer == BASE { 0 } else { bit(layer) };
    }

    pub fn set_one_shot(&mut self, layer: LayerId, on: bool) {
        set_bit(&mut self.one_shot, layer, on);
    }

    /// Holds a layer on for a word mode.
    pub fn set_locked(&mut self, layer: LayerId, on: bool) {
        set_bit(&mut self.locked, layer, on);
    }
}

fn set_bit(bits: &mut u32, layer: LayerId, on: bool) {
    if layer == BASE {
        return;
    }
    if on {
        *bits |= bit(layer);
    } else {
        *bits &= !bit(layer);
    }
}
