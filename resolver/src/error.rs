use thiserror::Error;

use crate::action::LayerId;
use crate::event::KCoord;

/// A keymap that cannot be loaded.
///
/// Resolution itself never fails; every error here is found once, when a
/// [`ResolverContext`](crate::ResolverContext) is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the keymap has no layers")]
    NoLayers,

    #[error("the keymap has {0} layers, at most {max} are supported", max = crate::layers::MAX_LAYERS)]
    TooManyLayers(usize),

    #[error("layer {layer} has {found} keys in row {row}, the base layer has {expected}")]
    LayerShape {
        layer: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layer {layer} has {found} rows, the base layer has {expected}")]
    LayerRows {
        layer: usize,
        expected: usize,
        found: usize,
    },

    #[error("an action at {coord:?} on layer {layer} refers to layer {target}, which does not exist")]
    LayerOutOfRange {
        layer: usize,
        coord: KCoord,
        target: LayerId,
    },

    #[error("combo `{name}` has {len} keys, at least two are required")]
    ComboTooShort { name: &'static str, len: usize },

    #[error("combo `{name}` uses a key that is not on the base layer: {key}")]
    ComboKeyNotOnBase { name: &'static str, key: String },

    #[error("combo `{name}` lists the same key twice")]
    ComboRepeatedKey { name: &'static str },

    #[error("combo `{name}` is bound to a dual-role action, which combos cannot send")]
    ComboDualRole { name: &'static str },

    #[error("combo `{name}` has the same keys and layers as combo `{other}`")]
    DuplicateCombo {
        name: &'static str,
        other: &'static str,
    },

    #[error("leader sequence {keys:?} conflicts with an earlier sequence")]
    LeaderConflict { keys: String },
}
