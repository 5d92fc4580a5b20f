//! Mitosis: 3x5 per half with two rows of four thumb keys per half.

use homerow_resolver::KeyCode::*;
use homerow_resolver::{
    k, mo, osm, tg, to, Hand, KCoord, Keymap, LayerId, LogicalAction, ResolverHooks,
};

use super::shared::*;
use super::Board;

pub struct Mitosis;

/// The two thumb rows of `layer`.
fn thumbs(layer: LayerId, t: Terms) -> [Vec<LogicalAction>; 2] {
    match layer {
        BASE => [
            join(vec![osm(LShift), osm(LCtrl), osm(LAlt), TR], trans(4)),
            vec![
                k(Escape),
                k(LCtrl),
                k(BSpace),
                sp_rai(t),
                ent_low(t),
                fun_tab(t),
                TR,
                TR,
            ],
        ],
        RAISE => [
            vec![TR, TR, home_dir(), k(Grave), arrow(), assign(), k(Slash), TR],
            join(trans(4), vec![sp_low(t), TR, TR, TR]),
        ],
        FUNCTION => [join(trans(4), vec![TR, to(BASE), TR, TR]), trans(8)],
        ADJUST => [trans(8), join(vec![eeprom_clear(), boot(), TR, TR], trans(4))],
        GAMING | GAMING2 => [
            keys(&[LShift, Escape, Tab, Kb1, Kb2, Kb3, Kb4, Kb5]),
            join(
                keys(&[LCtrl, LAlt, BSpace, Space, Enter, Delete]),
                vec![mo(FUNCTION), tg(BASE)],
            ),
        ],
        ROGUELIKE => [
            keys(&[LShift, Escape, Tab, Kb1, Kb2, Kb3, Kb4, Kb5]),
            join(
                keys(&[LCtrl, LAlt, BSpace, Space, Enter, Kp0]),
                vec![mo(FUNCTION), tg(BASE)],
            ),
        ],
        MOUSE => [
            trans(8),
            vec![TR, TR, k(MsBtn1), k(MsBtn2), k(MsBtn1), k(MsBtn2), TR, TR],
        ],
        _ => [trans(8), trans(8)],
    }
}

impl ResolverHooks for Mitosis {
    fn hand(&self, (row, col): KCoord) -> Hand {
        let half = if row < 3 { 5 } else { 4 };
        if col < half {
            Hand::Left
        } else {
            Hand::Right
        }
    }
}

impl Board for Mitosis {
    fn name(&self) -> &'static str {
        "mitosis"
    }

    fn keymap(&self) -> Keymap {
        let t = Terms::SHARED;
        let layers = (0..LAYER_NAMES.len() as LayerId)
            .map(|layer| {
                let [r0, r1, r2] = core(layer, t);
                let [t0, t1] = thumbs(layer, t);
                vec![r0, r1, r2, t0, t1]
            })
            .collect();
        Keymap {
            layers,
            combos: combos(t),
            config: config(),
        }
    }
}
