//! Kyria rev1: 3x6 per half, two extra keys per half on the bottom row and
//! five thumb keys per half.
//!
//! The Kyria carries its own six layer map with slightly longer decision
//! windows and only the J+K combo.

use homerow_resolver::KeyCode::*;
use homerow_resolver::{
    k, lt, mo, mt, osl, osm, s, text_then, tg, ComboSpec, ComboTier, Hand, KCoord, Keymap,
    Layer, LayerId, LogicalAction, MacroStep, ResolverConfig, ResolverHooks, TriLayer,
};

use super::shared::{
    arrow, assign, boot, double_colon, eeprom_clear, hm_a, hm_d, hm_f, hm_j, hm_k, hm_l, hm_s,
    hm_scln, join, keys, nkro_toggle, trans, Terms, TR,
};
use super::Board;

const BASE: LayerId = 0;
const LOWER: LayerId = 1;
const RAISE: LayerId = 2;
const FUNCTION: LayerId = 3;
const ADJUST: LayerId = 4;
const GAMING: LayerId = 5;

const LAYER_NAMES: [&str; 6] = ["base", "lower", "raise", "function", "adjust", "gaming"];

const TERMS: Terms = Terms {
    default: 175,
    home_row: 165,
    pinky: 185,
};

pub struct Kyria;

fn ctl_tab() -> LogicalAction {
    mt(LCtrl, Tab, TERMS.default)
}

fn ctl_quot() -> LogicalAction {
    mt(RCtrl, Quote, TERMS.default)
}

/// Types the firmware build command for this board.
fn compile() -> LogicalAction {
    text_then(
        "qmk compile -kb splitkb/kyria/rev1 -km naughtyusername",
        &[MacroStep::Tap(Enter)],
    )
}

fn layers() -> Vec<Layer> {
    let t = TERMS;
    let base = vec![
        keys(&[Escape, Q, W, E, R, T, Y, U, I, O, P, BSpace]),
        vec![
            ctl_tab(),
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
            ctl_quot(),
        ],
        join(
            join(keys(&[LShift, Z, X, C, V, B]), trans(4)),
            keys(&[N, M, Dot, Comma, Slash, RShift]),
        ),
        vec![
            k(Mute),
            osm(LCtrl),
            k(Tab),
            lt(RAISE, Space, t.default),
            k(BSpace),
            k(Delete),
            lt(LOWER, Enter, t.default),
            osl(FUNCTION),
            k(RAlt),
            k(Mute),
        ],
    ];
    let raise = vec![
        vec![
            TR,
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
            TR,
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
            vec![TR, TR, TR, arrow(), assign(), s(LBracket), TR, TR],
            vec![TR, TR, s(RBracket), s(Kb2), k(Dot), k(Comma), k(Slash), TR],
        ),
        trans(10),
    ];
    let lower = vec![
        join(
            join(vec![TR], keys(&[Kb1, Kb2, Kb3, Kb4, Kb5, Kb6, Kb7, Kb8, Kb9, Kb0])),
            vec![TR],
        ),
        join(
            vec![TR, TR, TR, k(VolUp), k(VolDown), k(Mute)],
            join(keys(&[Dot, Kb4, Kb5, Kb6, Kb0]), vec![TR]),
        ),
        join(
            join(
                vec![TR, TR, TR],
                keys(&[MediaPreviousSong, MediaPlayPause, MediaNextSong]),
            ),
            join(trans(5), join(keys(&[Kb1, Kb2, Kb3]), trans(2))),
        ),
        trans(10),
    ];
    let function = vec![
        join(
            join(vec![TR], keys(&[F9, F10, F11, F12, PScreen, PgUp, Home, End, Insert])),
            trans(2),
        ),
        join(
            join(vec![TR], keys(&[F5, F6, F7, F8])),
            join(vec![TR], join(keys(&[Left, Down, Up, Right]), trans(2))),
        ),
        join(
            join(vec![TR], keys(&[F1, F2, F3, F4])),
            join(trans(5), join(keys(&[PgDown]), trans(5))),
        ),
        trans(10),
    ];
    let adjust = vec![
        join(
            vec![TR, tg(BASE), TR, TR, TR, compile()],
            join(keys(&[MsUp, MsBtn1, MsBtn2, MsBtn3]), vec![nkro_toggle(), TR]),
        ),
        join(trans(6), join(keys(&[MsLeft, MsDown, MsUp, MsRight]), trans(2))),
        join(
            join(trans(5), vec![tg(GAMING), TR, TR, TR, TR]),
            join(keys(&[MsDown, MsWheelDown, MsWheelUp]), trans(3)),
        ),
        join(vec![TR, eeprom_clear(), boot()], trans(7)),
    ];
    let gaming = vec![
        keys(&[Escape, Q, W, E, R, T, Y, U, I, O, P, BSpace]),
        join(
            join(vec![ctl_tab()], keys(&[A, S, D, F, G, H, J, K, L, SColon])),
            vec![ctl_quot()],
        ),
        join(
            join(keys(&[LShift, Z, X, C, V, B]), trans(4)),
            keys(&[N, M, Comma, Dot, Slash, RShift]),
        ),
        join(
            keys(&[Mute, LCtrl, Tab, Space, BSpace, Delete, Enter]),
            vec![mo(FUNCTION), tg(GAMING), k(Mute)],
        ),
    ];
    vec![base, lower, raise, function, adjust, gaming]
}

impl ResolverHooks for Kyria {
    fn hand(&self, (row, col): KCoord) -> Hand {
        let half = match row {
            0 | 1 => 6,
            2 => 8,
            _ => 5,
        };
        if col < half {
            Hand::Left
        } else {
            Hand::Right
        }
    }
}

impl Board for Kyria {
    fn name(&self) -> &'static str {
        "kyria"
    }

    fn layer_names(&self) -> &'static [&'static str] {
        &LAYER_NAMES
    }

    fn keymap(&self) -> Keymap {
        let mut config = ResolverConfig {
            tapping_term: TERMS.default,
            quick_tap_term: Some(TERMS.default),
            tri_layer: Some(TriLayer {
                lower: LOWER,
                raise: RAISE,
                adjust: ADJUST,
            }),
            caps_word_idle_timeout: 3000,
            num_word_layer: LOWER,
            one_shot_timeout: Some(500),
            one_shot_tap_toggle: Some(2),
            key_overrides: vec![],
            ..Default::default()
        };
        config.flow_tap_keys.insert(Space);
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
