//! Zima: a 4x3 macropad with a number pad, media keys and a system layer.

use homerow_resolver::KeyCode::*;
use homerow_resolver::{
    k, tg, Hand, KCoord, Keymap, LayerId, LogicalAction, ResolverConfig, ResolverHooks,
};

use super::shared::{boot, eeprom_clear, keys, trans, TR};
use super::Board;

const MEDIA: LayerId = 1;
const SYSTEM: LayerId = 2;

const LAYER_NAMES: [&str; 3] = ["numpad", "media", "system"];

/// Lighting controls are not emitted.
const NOOP: LogicalAction = LogicalAction::NoOp;

pub struct Zima;

impl ResolverHooks for Zima {
    fn hand(&self, _: KCoord) -> Hand {
        Hand::Any
    }
}

impl Board for Zima {
    fn name(&self) -> &'static str {
        "zima"
    }

    fn layer_names(&self) -> &'static [&'static str] {
        &LAYER_NAMES
    }

    fn keymap(&self) -> Keymap {
        let numpad = vec![
            vec![k(Mute), tg(MEDIA), tg(SYSTEM)],
            keys(&[Kp7, Kp8, Kp9]),
            keys(&[Kp4, Kp5, Kp6]),
            keys(&[Kp1, Kp2, Kp3]),
        ];
        let media = vec![
            vec![k(Mute), TR, tg(SYSTEM)],
            keys(&[MediaPreviousSong, MediaPlayPause, MediaNextSong]),
            vec![TR, k(MediaStop), TR],
            trans(3),
        ];
        let system = vec![
            vec![NOOP, TR, TR],
            vec![NOOP; 3],
            vec![NOOP; 3],
            vec![boot(), eeprom_clear(), NOOP],
        ];
        let config = ResolverConfig {
            tri_layer: None,
            key_overrides: vec![],
            ..Default::default()
        };
        Keymap {
            layers: vec![numpad, media, system],
            combos: vec![],
            config,
        }
    }
}
