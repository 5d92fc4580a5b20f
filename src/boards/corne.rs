//! Corne: 3x6 per half with three thumb keys per half.

use homerow_resolver::KeyCode::*;
use homerow_resolver::{k, mo, tg, to, Hand, KCoord, Keymap, LayerId, LogicalAction, ResolverHooks};

use super::shared::*;
use super::Board;

pub struct Corne;

fn thumbs(layer: LayerId, t: Terms) -> Vec<LogicalAction> {
    match layer {
        BASE => vec![
            k(Escape),
            k(BSpace),
            sp_rai(t),
            ent_low(t),
            k(Quote),
            k(Tab),
        ],
        RAISE => vec![TR, home_dir(), TR, sp_low(t), assign(), arrow()],
        FUNCTION => vec![TR, TR, TR, TR, to(BASE), TR],
        ADJUST => join(vec![eeprom_clear(), boot()], trans(4)),
        GAMING | GAMING2 => join(
            keys(&[LCtrl, LAlt, Space, Enter]),
            vec![mo(FUNCTION), tg(BASE)],
        ),
        ROGUELIKE => join(keys(&[LCtrl, LAlt, Space, Enter, Kp0]), vec![tg(BASE)]),
        MOUSE => vec![TR, k(MsBtn2), k(MsBtn1), k(MsBtn1), k(MsBtn2), TR],
        _ => trans(6),
    }
}

impl ResolverHooks for Corne {
    fn hand(&self, (row, col): KCoord) -> Hand {
        let half = if row < 3 { 6 } else { 3 };
        if col < half {
            Hand::Left
        } else {
            Hand::Right
        }
    }
}

impl Board for Corne {
    fn name(&self) -> &'static str {
        "corne"
    }

    fn keymap(&self) -> Keymap {
        let t = Terms::SHARED;
        let layers = (0..LAYER_NAMES.len() as LayerId)
            .map(|layer| {
                let [r0, r1, r2] = six_column(layer, t);
                vec![r0, r1, r2, thumbs(layer, t)]
            })
            .collect();
        Keymap {
            layers,
            combos: combos(t),
            config: config(),
        }
    }
}
