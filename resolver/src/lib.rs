//! Key resolution for split keyboards with home row mods.
//!
//! Physical key events go through a combo detector, then a tap-hold
//! resolver, then the layer stack and finally a dispatcher that reports
//! host key presses and releases. Everything is driven by
//! [`ResolverContext::event`] and [`ResolverContext::tick`] with virtual time,
//! so the same code runs on a board, in a simulator and in tests.

pub mod action;
pub mod caps_word;
pub mod combo;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hold_tap;
pub mod key_code;
pub mod key_override;
pub mod layers;
pub mod leader;
pub mod num_word;

pub use action::{
    k, lt, mo, mt, osl, osm, s, steps, text, text_then, tg, to, CustomAction, HoldTapAction,
    LayerId, LayerMode, LogicalAction, MacroStep, SystemAction,
};
pub use combo::{ComboSpec, ComboTier, LayerPredicate};
pub use config::{ComboTerms, Hand, ResolverConfig, ResolverHooks};
pub use context::{Keymap, ResolverContext};
pub use dispatch::Action;
pub use error::ConfigError;
pub use event::{Event, KCoord, COMBO_ROW};
pub use hold_tap::{Decision, Reason};
pub use key_code::{KeyCode, Mods};
pub use key_override::KeyOverride;
pub use layers::{Layer, LayerState, LayerTable, TriLayer, BASE};
pub use leader::LeaderSequence;
