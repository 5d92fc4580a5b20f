//! Planck EZ: a 4x12 grid with a 2u space bar, so the bottom row has 11 keys.

use homerow_resolver::KeyCode::*;
use homerow_resolver::{
    k, mo, s, tg, to, ComboSpec, ComboTier, Hand, KCoord, Keymap, Layer, LayerId, LogicalAction,
    ResolverConfig, ResolverHooks, TriLayer,
};

use super::shared::{
    arrow, assign, boot, caps_word, double_colon, eeprom_clear, hm_a, hm_d, hm_f, hm_j, hm_k,
    hm_l, hm_s, hm_scln, join, keys, trans, Terms, TR,
};
use super::Board;

const BASE: LayerId = 0;
const LOWER: LayerId = 1;
const RAISE: LayerId = 2;
const ADJUST: LayerId = 4;
const GAMING: LayerId = 5;

const LAYER_NAMES: [&str; 6] = ["base", "lower", "raise", "function", "adjust", "gaming"];

/// Debug and lighting toggles have no counterpart here.
const NOOP: LogicalAction = LogicalAction::NoOp;

const TERMS: Terms = Terms {
    default: 175,
    home_row: 175,
    pinky: 175,
};

pub struct Planck;

fn bottom_row() -> Vec<LogicalAction> {
    join(
        vec![k(LCtrl), k(LGui), k(LAlt), caps_word(), mo(RAISE), k(Space), mo(LOWER)],
        keys(&[Left, Down, Up, Right]),
    )
}

fn layers() -> Vec<Layer> {
    let t = TERMS;
    let base = vec![
        keys(&[Tab, Q, W, E, R, T, Y, U, I, O, P, BSpace]),
        vec![
            k(Escape),
            hm_a(t),
            hm_s(t),
            hm_d(t),
            hm_f(t),
            k(G),
            k(H),
            hm_j(t),
            hm_k(t),
            hm_l(t),
            hm_scln(t),
            k(Quote),
        ],
        keys(&[LShift, Z, X, C, V, B, N, M, Comma, Dot, Slash, Enter]),
        bottom_row(),
    ];
    let raise = vec![
        vec![
            k(Grave),
            s(Kb5),
            s(Kb4),
            k(Minus),
            s(Bslash),
            k(LBracket),
            k(RBracket),
            s(Equal),
            s(Kb3),
            s(Comma),
            s(Dot),
            k(Delete),
        ],
        vec![
            TR,
            s(Kb1),
            s(Kb8),
            k(Equal),
            s(Kb7),
            s(Kb9),
            s(Kb0),
            s(Kb6),
            s(Minus),
            s(Quote),
            double_colon(),
            TR,
        ],
        join(
            vec![TR, TR, arrow(), assign(), s(LBracket), TR, TR],
            vec![s(RBracket), s(Kb2), TR, TR, TR],
        ),
        join(trans(6), join(vec![mo(LOWER)], trans(4))),
    ];
    let lower = vec![
        join(
            vec![s(Grave)],
            [Kb1, Kb2, Kb3, Kb4, Kb5, Kb6, Kb7, Kb8, Kb9, Kb0]
                .into_iter()
                .map(s)
                .chain([k(Delete)])
                .collect(),
        ),
        join(
            vec![TR],
            join(keys(&[Kb1, Kb2, Kb3, Kb4, Kb5, Kb6, Kb7, Kb8, Kb9, Kb0]), vec![TR]),
        ),
        trans(12),
        trans(11),
    ];
    let function = vec![
        join(
            join(vec![TR], keys(&[F9, F10, F11, F12, PScreen])),
            join(vec![TR], join(keys(&[PgUp, Home, End, Insert]), vec![TR])),
        ),
        join(
            join(vec![TR], keys(&[F5, F6, F7, F8])),
            join(trans(2), join(keys(&[Left, Down, Up, Right]), vec![TR])),
        ),
        join(
            join(vec![TR], keys(&[F1, F2, F3, F4])),
            join(trans(2), join(keys(&[PgDown]), trans(4))),
        ),
        trans(11),
    ];
    let adjust = vec![
        join(vec![TR, to(BASE), boot(), NOOP, NOOP], trans(7)),
        join(trans(7), join(keys(&[MsUp, MsBtn1, MsBtn2, MsBtn3]), vec![TR])),
        join(trans(7), join(keys(&[MsLeft, MsDown, MsUp, MsRight]), vec![TR])),
        join(
            vec![TR, TR, TR, TR, tg(GAMING), TR, eeprom_clear()],
            trans(4),
        ),
    ];
    let gaming = vec![
        keys(&[Tab, Q, W, E, R, T, Y, U, I, O, P, BSpace]),
        keys(&[Escape, A, S, D, F, G, H, J, K, L, SColon, Enter]),
        join(
            keys(&[LShift, Z, X, C, V, B, N, M, Comma, Dot, Slash]),
            vec![TR],
        ),
        join(
            vec![k(LCtrl), k(LAlt), k(LGui), tg(GAMING), mo(RAISE), k(Space), mo(LOWER)],
            keys(&[Left, Down, Up, Right]),
        ),
    ];
    vec![base, lower, raise, function, adjust, gaming]
}

impl ResolverHooks for Planck {
    /// The 2u space bar sits left of the middle, so it counts as left.
    fn hand(&self, (_, col): KCoord) -> Hand {
        if col < 6 {
            Hand::Left
        } else {
            Hand::Right
        }
    }
}

impl Board for Planck {
    fn name(&self) -> &'static str {
        "planck"
    }

    fn layer_names(&self) -> &'static [&'static str] {
        &LAYER_NAMES
    }

    fn keymap(&self) -> Keymap {
        let config = ResolverConfig {
            tapping_term: TERMS.default,
            quick_tap_term: None,
            flow_tap_term: 0,
            tri_layer: Some(TriLayer {
                lower: LOWER,
                raise: RAISE,
                adjust: ADJUST,
            }),
            caps_word_idle_timeout: 3000,
            num_word_layer: LOWER,
            one_shot_tap_toggle: Some(2),
            ..Default::default()
        };
        let combos = vec![
            ComboSpec::new("jk_esc", [hm_j(TERMS), hm_k(TERMS)], k(Escape))
                .tier(ComboTier::Custom(50)),
        ];
        Keymap {
            layers: layers(),
            combos,
            config,
        }
    }
}
