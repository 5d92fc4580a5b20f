use super::*;
use crate::boards::mitosis::Mitosis;
use crate::boards::{Board, BoardContext};
use crate::sim::{run, SimItem};
use homerow_resolver::KeyCode::{self, *};
use homerow_resolver::{Action, ResolverContext};
use proptest::prelude::*;

/// Column, tap and hold of the Mitosis home row mods.
const HOME_ROW: [(u16, KeyCode, KeyCode); 8] = [
    (0, A, LGui),
    (1, S, LAlt),
    (2, D, LCtrl),
    (3, F, LShift),
    (6, J, RShift),
    (7, K, RCtrl),
    (8, L, RAlt),
    (9, SColon, RGui),
];

const TERM: u64 = 185;

/// Mitosis without combos, so presses reach the tap-hold stage unbuffered.
/// Both shifts held do not start caps word here.
fn context() -> BoardContext {
    let board: Box<dyn Board> = Box::new(Mitosis);
    let mut keymap = board.keymap();
    keymap.combos.clear();
    keymap.config.both_shifts_caps_word = false;
    ResolverContext::new(keymap, board).expect("keymap is valid")
}

/// Each cycle is (key, held for, pause after). Pauses are longer than the
/// flow tap and quick tap windows, so only the hold time decides.
fn expected(cycles: &[(usize, u16, u16)]) -> Vec<(u64, Action)> {
    let mut now = 0;
    let mut out = vec![];
    for &(key, held, pause) in cycles {
        let (_, tap, modifier) = HOME_ROW[key];
        let held = u64::from(held);
        if held < TERM {
            out.push((now + held, Action::Press(tap)));
            out.push((now + held, Action::Release(tap)));
        } else {
            out.push((now + TERM, Action::Press(modifier)));
            out.push((now + held, Action::Release(modifier)));
        }
        now += held + u64::from(pause);
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn tap_hold_cycles_follow_the_decision_window(
        cycles in prop::collection::vec((0..HOME_ROW.len(), 1u16..300, 200u16..300), 1..6)
    ) {
        init_log();
        let mut ctx = context();
        let items: Vec<SimItem> = cycles
            .iter()
            .flat_map(|&(key, held, pause)| {
                let coord = (1, HOME_ROW[key].0);
                [
                    SimItem::Press(coord),
                    SimItem::Wait(held.into()),
                    SimItem::Release(coord),
                    SimItem::Wait(pause.into()),
                ]
            })
            .collect();
        let log = run(&mut ctx, &items);
        prop_assert_eq!(expected(&cycles), log);
        prop_assert!(ctx.is_idle());
        prop_assert!(ctx.active_keys().is_empty());
    }
}

/// Two different home row keys, on the same hand or on opposite hands.
fn two_keys() -> impl Strategy<Value = (usize, usize)> {
    (0..HOME_ROW.len(), 1..HOME_ROW.len()).prop_map(|(a, off)| (a, (a + off) % HOME_ROW.len()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5_000))]

    #[test]
    fn overlapping_keys_each_send_one_tap_or_one_hold(
        (a, b) in two_keys(),
        waits in prop::array::uniform3(1u16..250),
        a_released_first in any::<bool>(),
    ) {
        init_log();
        let mut ctx = context();
        let coord = |key: usize| (1, HOME_ROW[key].0);
        let (first, second) = if a_released_first { (a, b) } else { (b, a) };
        let items = [
            SimItem::Press(coord(a)),
            SimItem::Wait(waits[0].into()),
            SimItem::Press(coord(b)),
            SimItem::Wait(waits[1].into()),
            SimItem::Release(coord(first)),
            SimItem::Wait(waits[2].into()),
            SimItem::Release(coord(second)),
            SimItem::Wait(300),
        ];
        let log = run(&mut ctx, &items);
        for key in [a, b] {
            let (_, tap, modifier) = HOME_ROW[key];
            let sent = |kc: KeyCode| {
                log.iter()
                    .map(|(_, action)| *action)
                    .filter(|action| match action {
                        Action::Press(k) | Action::Release(k) => *k == kc,
                        Action::System(_) => false,
                    })
                    .collect::<Vec<_>>()
            };
            let (taps, holds) = (sent(tap), sent(modifier));
            prop_assert!(
                (taps == [Action::Press(tap), Action::Release(tap)] && holds.is_empty())
                    || (holds == [Action::Press(modifier), Action::Release(modifier)]
                        && taps.is_empty()),
                "{:?}",
                log
            );
        }
        prop_assert_eq!(4, log.len(), "{:?}", log);
        prop_assert!(ctx.is_idle());
        prop_assert!(ctx.active_keys().is_empty());
    }
}
