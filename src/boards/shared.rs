//! Layers, combos and macros shared by the split boards.
//!
//! Every split board uses the same 3x5 core on each layer. Boards with a
//! sixth column add [`outer`] around it and each board brings its own thumb
//! cluster.

use homerow_resolver::action::text_steps;
use homerow_resolver::KeyCode::{self, *};
use homerow_resolver::{
    k, lt, mt, osm, s, text, text_then, tg, to, ComboSpec, ComboTier, CustomAction, LayerId,
    LayerPredicate, LeaderSequence, LogicalAction, MacroStep, ResolverConfig, SystemAction,
    TriLayer,
};

pub const BASE: LayerId = 0;
pub const VIM: LayerId = 1;
pub const LOWER: LayerId = 2;
pub const RAISE: LayerId = 3;
pub const FUNCTION: LayerId = 4;
pub const ADJUST: LayerId = 5;
pub const GAMING: LayerId = 6;
pub const GAMING2: LayerId = 7;
pub const ROGUELIKE: LayerId = 8;
pub const SYS: LayerId = 9;
pub const MOUSE: LayerId = 10;

pub const LAYER_NAMES: [&str; 11] = [
    "base",
    "vim",
    "lower",
    "raise",
    "function",
    "adjust",
    "gaming",
    "gaming2",
    "roguelike",
    "sys",
    "mouse",
];

/// Shorthand for a transparent entry.
pub const TR: LogicalAction = LogicalAction::Trans;

/// Decision windows of the dual-role keys, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Terms {
    /// Layer-taps and everything not listed below.
    pub default: u16,
    /// Index and middle and ring finger home row mods.
    pub home_row: u16,
    /// Pinky home row mods.
    pub pinky: u16,
}

impl Terms {
    pub const SHARED: Terms = Terms {
        default: 125,
        home_row: 185,
        pinky: 185,
    };
}

pub fn hm_a(t: Terms) -> LogicalAction {
    mt(LGui, A, t.pinky)
}
pub fn hm_s(t: Terms) -> LogicalAction {
    mt(LAlt, S, t.home_row)
}
pub fn hm_d(t: Terms) -> LogicalAction {
    mt(LCtrl, D, t.home_row)
}
pub fn hm_f(t: Terms) -> LogicalAction {
    mt(LShift, F, t.home_row)
}
pub fn hm_j(t: Terms) -> LogicalAction {
    mt(RShift, J, t.home_row)
}
pub fn hm_k(t: Terms) -> LogicalAction {
    mt(RCtrl, K, t.home_row)
}
pub fn hm_l(t: Terms) -> LogicalAction {
    mt(RAlt, L, t.home_row)
}
pub fn hm_scln(t: Terms) -> LogicalAction {
    mt(RGui, SColon, t.pinky)
}

pub fn sp_rai(t: Terms) -> LogicalAction {
    lt(RAISE, Space, t.default)
}
pub fn sp_low(t: Terms) -> LogicalAction {
    lt(LOWER, Space, t.default)
}
pub fn ent_low(t: Terms) -> LogicalAction {
    lt(LOWER, Enter, t.default)
}
pub fn fun_tab(t: Terms) -> LogicalAction {
    lt(FUNCTION, Tab, t.default)
}
/// Z on tap, the system layer on hold.
pub fn sys_z(t: Terms) -> LogicalAction {
    lt(SYS, Z, t.default)
}

pub fn assign() -> LogicalAction {
    text(":=")
}
pub fn arrow() -> LogicalAction {
    text("->")
}
pub fn double_colon() -> LogicalAction {
    text("::")
}
pub fn home_dir() -> LogicalAction {
    text("~/")
}

pub const fn caps_word() -> LogicalAction {
    LogicalAction::Custom(CustomAction::CapsWordToggle)
}
pub const fn num_word() -> LogicalAction {
    LogicalAction::Custom(CustomAction::NumWordToggle)
}
pub const fn leader() -> LogicalAction {
    LogicalAction::Custom(CustomAction::Leader)
}
pub const fn boot() -> LogicalAction {
    LogicalAction::Custom(CustomAction::System(SystemAction::Bootloader))
}
pub const fn eeprom_clear() -> LogicalAction {
    LogicalAction::Custom(CustomAction::System(SystemAction::EepromClear))
}
pub const fn nkro_toggle() -> LogicalAction {
    LogicalAction::Custom(CustomAction::System(SystemAction::NkroToggle))
}

/// A row of plain keys.
pub fn keys(kcs: &[KeyCode]) -> Vec<LogicalAction> {
    kcs.iter().copied().map(k).collect()
}

/// Concatenates the two halves of a row.
pub fn join(left: Vec<LogicalAction>, right: Vec<LogicalAction>) -> Vec<LogicalAction> {
    let mut row = left;
    row.extend(right);
    row
}

pub fn trans(n: usize) -> Vec<LogicalAction> {
    vec![TR; n]
}

fn qwerty() -> [Vec<LogicalAction>; 3] {
    [
        keys(&[Q, W, E, R, T, Y, U, I, O, P]),
        keys(&[A, S, D, F, G, H, J, K, L, SColon]),
        keys(&[Z, X, C, V, B, N, M, Comma, Dot, Slash]),
    ]
}

/// The three 10 key rows of `layer`, left half first.
pub fn core(layer: LayerId, t: Terms) -> [Vec<LogicalAction>; 3] {
    match layer {
        BASE => [
            keys(&[Q, W, E, R, T, Y, U, I, O, P]),
            vec![
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
            ],
            join(vec![sys_z(t)], keys(&[X, C, V, B, N, M, Comma, Dot, Slash])),
        ],
        VIM | GAMING => qwerty(),
        GAMING2 => [
            join(keys(&[F1, F2, F3, F4, F5]), trans(5)),
            join(keys(&[Kb1, Kb2, Kb3, Kb4, Kb5]), trans(5)),
            join(keys(&[Kb6, Kb7, Kb8, Kb9, Kb0]), trans(5)),
        ],
        ROGUELIKE => [
            join(keys(&[Q, W, E, R, T]), vec![TR, k(Kp7), k(Kp8), k(Kp9), TR]),
            join(keys(&[A, S, D, F, G]), vec![k(KpDot), k(Kp4), k(Kp5), k(Kp6), TR]),
            join(keys(&[Z, X, C, V, B]), vec![TR, k(Kp1), k(Kp2), k(Kp3), TR]),
        ],
        LOWER => [
            keys(&[Kb1, Kb2, Kb3, Kb4, Kb5, Kb6, Kb7, Kb8, Kb9, Kb0]),
            join(
                vec![TR, TR, k(VolUp), k(VolDown), k(Mute)],
                keys(&[Dot, Kb4, Kb5, Kb6, Kb0]),
            ),
            join(
                vec![
                    TR,
                    TR,
                    k(MediaPreviousSong),
                    k(MediaPlayPause),
                    k(MediaNextSong),
                ],
                vec![s(Equal), k(Kb1), k(Kb2), k(Kb3), k(Minus)],
            ),
        ],
        RAISE => [
            vec![
                k(Bslash),
                s(Kb4),
                s(Bslash),
                k(Minus),
                k(LBracket),
                k(RBracket),
                s(Equal),
                s(Kb3),
                k(SColon),
                double_colon(),
            ],
            vec![
                s(Grave),
                s(Kb7),
                s(Kb8),
                k(Equal),
                s(Kb9),
                s(Kb0),
                s(Kb6),
                s(Minus),
                s(Kb5),
                s(SColon),
            ],
            vec![
                k(Grave),
                s(Kb1),
                k(Quote),
                s(Quote),
                s(LBracket),
                s(RBracket),
                s(Kb2),
                s(Comma),
                s(Dot),
                s(Slash),
            ],
        ],
        FUNCTION => [
            keys(&[F9, F10, F11, F12, PScreen, PgUp, Home, End, Insert, Delete]),
            join(keys(&[F5, F6, F7, F8]), vec![TR, k(Left), k(Down), k(Up), k(Right), TR]),
            join(keys(&[F1, F2, F3, F4]), vec![TR, k(PgDown), TR, TR, TR, TR]),
        ],
        ADJUST => [
            vec![tg(BASE), tg(GAMING), TR, TR, k(CapsLock), TR, TR, TR, TR, nkro_toggle()],
            join(vec![TR, TR, TR, TR, num_word()], trans(5)),
            trans(10),
        ],
        SYS => [
            vec![TR, tg(BASE), tg(GAMING), TR, TR, TR, TR, TR, TR, nkro_toggle()],
            join(
                vec![boot(), eeprom_clear(), TR, TR, TR],
                vec![TR, TR, TR, eeprom_clear(), boot()],
            ),
            trans(10),
        ],
        MOUSE => [
            join(
                keys(&[MsWheelLeft, MsWheelDown, MsWheelUp, MsWheelRight]),
                vec![TR, TR, k(MsBtn1), k(MsBtn2), k(MsBtn3), TR],
            ),
            keys(&[
                MsAccel0, MsLeft, MsDown, MsUp, MsRight, Left, Down, Up, Right, MsAccel0,
            ]),
            join(
                keys(&[MsAccel1, MsAccel2, MsBtn1, MsBtn2, MsBtn3]),
                vec![TR, k(MsBtn1), k(MsBtn2), k(MsAccel2), k(MsAccel1)],
            ),
        ],
        _ => [trans(10), trans(10), trans(10)],
    }
}

/// The outer column keys of `layer` for boards with six columns per half,
/// as (left, right) per row.
pub fn outer(layer: LayerId) -> [(LogicalAction, LogicalAction); 3] {
    match layer {
        BASE | VIM => [
            (k(Tab), k(BSpace)),
            (k(Escape), k(Quote)),
            (k(LShift), k(RShift)),
        ],
        GAMING | GAMING2 => [
            (k(Tab), k(BSpace)),
            (k(Escape), k(Quote)),
            (k(LShift), k(Enter)),
        ],
        ROGUELIKE => [(k(Tab), TR), (k(Escape), TR), (k(LShift), TR)],
        LOWER | RAISE => [(k(Grave), k(BSpace)), (TR, TR), (TR, TR)],
        _ => [(TR, TR), (TR, TR), (TR, TR)],
    }
}

/// The core of `layer` widened with its outer columns.
pub fn six_column(layer: LayerId, t: Terms) -> [Vec<LogicalAction>; 3] {
    let outer = outer(layer);
    let mut rows = core(layer, t);
    for (row, (left, right)) in rows.iter_mut().zip(outer) {
        row.insert(0, left);
        row.push(right);
    }
    rows
}

fn base_or_vim() -> LayerPredicate {
    LayerPredicate::AnyOf(vec![BASE, VIM])
}

fn base_vim_lower() -> LayerPredicate {
    LayerPredicate::AnyOf(vec![BASE, VIM, LOWER])
}

fn only(layer: LayerId) -> LayerPredicate {
    LayerPredicate::AnyOf(vec![layer])
}

/// Types `pair` and moves the cursor back between its two characters.
fn pair(chars: &str) -> LogicalAction {
    text_then(chars, &[MacroStep::Tap(Left)])
}

/// The combos of the full shared layout. Keys refer to base layer entries.
pub fn combos(t: Terms) -> Vec<ComboSpec> {
    use ComboTier::*;
    let (a, s_, d, f) = (hm_a(t), hm_s(t), hm_d(t), hm_f(t));
    let (j, k_, l, scln) = (hm_j(t), hm_k(t), hm_l(t), hm_scln(t));
    vec![
        ComboSpec::new("hj_caps_word", [k(H), j.clone()], caps_word()).on(base_or_vim()),
        ComboSpec::new("yh_num_word", [k(Y), k(H)], num_word()).on(base_or_vim()),
        ComboSpec::new("jk_esc", [j.clone(), k_.clone()], k(Escape)).on(base_or_vim()),
        ComboSpec::new("lscln_enter", [l.clone(), scln.clone()], k(Enter)).on(base_or_vim()),
        ComboSpec::new("df_underscore", [d.clone(), f.clone()], s(Minus)).on(base_vim_lower()),
        ComboSpec::new("fg_tab", [f, k(G)], k(Tab)).on(base_vim_lower()),
        ComboSpec::new("as_backspace", [a, s_], k(BSpace)).on(base_vim_lower()),
        ComboSpec::new("hn_equal", [k(H), k(N)], k(Equal)).on(base_vim_lower()),
        ComboSpec::new("cv_minus", [k(C), k(V)], k(Minus))
            .tier(Slow)
            .on(base_vim_lower()),
        ComboSpec::new("zx_delete", [sys_z(t), k(X)], k(Delete))
            .tier(Slow)
            .on(base_vim_lower()),
        ComboSpec::new("dc_assign", [d, k(C)], assign())
            .tier(Slow)
            .on(base_vim_lower()),
        ComboSpec::new("gb_leader", [k(G), k(B)], leader())
            .tier(Slow)
            .on(base_vim_lower()),
        ComboSpec::new("vb_space", [k(V), k(B)], k(Space))
            .tier(Slow)
            .on(base_vim_lower()),
        ComboSpec::new("kl_quote", [k_.clone(), l.clone()], k(Quote)).on(base_or_vim()),
        ComboSpec::new("jkl_dquote", [j.clone(), k_.clone(), l.clone()], s(Quote))
            .on(base_or_vim()),
        ComboSpec::new(
            "klscln_colon_caret",
            [k_.clone(), l, scln],
            text_then(": ^", &[MacroStep::OneShot(LShift)]),
        )
        .on(base_or_vim()),
        ComboSpec::new("nm_parens", [k(N), k(M)], pair("()")).on(base_or_vim()),
        ComboSpec::new("mcomm_braces", [k(M), k(Comma)], pair("{}")).on(base_or_vim()),
        ComboSpec::new("commdot_brackets", [k(Comma), k(Dot)], pair("[]")).on(base_or_vim()),
        ComboSpec::new("kcomm_dquotes", [k_, k(Comma)], pair("\"\"")).on(base_or_vim()),
        ComboSpec::new("jm_squotes", [j.clone(), k(M)], pair("''")).on(base_or_vim()),
        ComboSpec::new("qw_gui", [k(Q), k(W)], osm(LGui))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("we_alt", [k(W), k(E)], osm(LAlt))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("er_ctrl", [k(E), k(R)], osm(LCtrl))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("rt_shift", [k(R), k(T)], osm(LShift))
            .tier(Fast)
            .on(base_or_vim()),
        ComboSpec::new("yu_shift", [k(Y), k(U)], osm(RShift))
            .tier(Fast)
            .on(base_or_vim()),
        ComboSpec::new("ui_ctrl", [k(U), k(I)], osm(RCtrl))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("io_alt", [k(I), k(O)], osm(RAlt))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("op_gui", [k(O), k(P)], osm(RGui))
            .tier(Fast)
            .on(only(VIM)),
        ComboSpec::new("qwe_base", [k(Q), k(W), k(E)], to(BASE))
            .tier(Slow)
            .on(LayerPredicate::NoneOf(vec![BASE])),
        ComboSpec::new("asd_gaming", [hm_a(t), hm_s(t), hm_d(t)], to(GAMING))
            .tier(Slow)
            .on(only(BASE)),
        ComboSpec::new("nmcomm_vim", [k(N), k(M), k(Comma)], to(VIM))
            .tier(Slow)
            .on(only(BASE)),
        ComboSpec::new("yui_gaming2", [k(Y), k(U), k(I)], to(GAMING2))
            .tier(Slow)
            .on(only(GAMING)),
        ComboSpec::new("hjk_roguelike", [k(H), j.clone(), hm_k(t)], to(ROGUELIKE))
            .tier(Slow)
            .on(only(GAMING)),
        ComboSpec::new("yui_gaming", [k(Y), k(U), k(I)], to(GAMING))
            .tier(Slow)
            .on(only(GAMING2)),
        ComboSpec::new("hjk_gaming", [k(H), j, hm_k(t)], to(GAMING))
            .tier(Slow)
            .on(only(ROGUELIKE)),
        ComboSpec::new("nmcomm_base", [k(N), k(M), k(Comma)], to(BASE))
            .tier(Slow)
            .on(only(VIM)),
    ]
}

/// Leader sequences for the programming macros.
pub fn leader_sequences() -> Vec<LeaderSequence> {
    [
        (&[A, S][..], ":="),
        (&[A, R], "->"),
        (&[D, C], "::"),
        (&[R, G], "..="),
        (&[H, D], "~/"),
    ]
    .into_iter()
    .map(|(keys, out)| LeaderSequence::new(keys, text_steps(out)))
    .collect()
}

/// The shared userspace configuration: LOWER and RAISE make ADJUST, num
/// word runs on LOWER.
pub fn config() -> ResolverConfig {
    ResolverConfig {
        tri_layer: Some(TriLayer {
            lower: LOWER,
            raise: RAISE,
            adjust: ADJUST,
        }),
        num_word_layer: LOWER,
        leader_sequences: leader_sequences(),
        ..Default::default()
    }
}
