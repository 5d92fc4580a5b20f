use super::*;

#[test]
fn sim_combo_of_home_row_mods_taps() {
    let result = simulate("mitosis", "d:j t:10 d:k t:30 u:j u:k");
    assert_eq!("t:40ms dn:Escape up:Escape", result);
}

#[test]
fn sim_combo_of_home_row_mods_held_is_both_mods() {
    let result = simulate("mitosis", "d:j d:k t:200 u:j u:k");
    assert_eq!("t:185ms dn:RShift dn:RCtrl t:15ms up:RShift up:RCtrl", result);
}

#[test]
fn sim_same_hand_home_row_mods_held_together() {
    let result = simulate("mitosis", "d:d t:40 d:f t:300 u:d u:f");
    assert_eq!(
        "t:185ms dn:LCtrl t:40ms dn:LShift t:115ms up:LCtrl up:LShift",
        result
    );
}

#[test]
fn sim_same_hand_combo_taps_home_row_mod() {
    let result = simulate("mitosis", "d:s t:30 d:c d:v t:10 u:c u:v t:10 u:s");
    assert_eq!("t:30ms dn:S dn:Minus t:10ms up:Minus t:10ms up:S", result);
}

#[test]
fn sim_combo_waits_for_larger_combo() {
    let result = simulate("mitosis", "d:n t:5 d:m t:50 u:n u:m");
    assert_eq!(
        "t:50ms dn:LShift dn:Kb9 up:Kb9 up:LShift \
         dn:LShift dn:Kb0 up:Kb0 up:LShift dn:Left up:Left",
        result
    );
}

#[test]
fn sim_parens_combo_keeps_held_shift() {
    let result = simulate(
        "mitosis",
        "d:f t:10 d:n d:m t:40 u:n u:m t:10 d:o u:o t:10 u:f",
    );
    assert_eq!(
        "t:50ms dn:LShift dn:Kb9 up:Kb9 dn:Kb0 up:Kb0 dn:Left up:Left \
         t:10ms dn:O up:O t:10ms up:LShift",
        result
    );
}

#[test]
fn sim_combo_window_missed() {
    let result = simulate("mitosis", "d:n t:60 d:m t:10 u:n u:m");
    assert_eq!("t:50ms dn:N t:20ms dn:M up:N up:M", result);
}

#[test]
fn sim_kyria_slow_jk_combo() {
    let result = simulate("kyria", "d:j t:45 d:k t:10 u:j u:k");
    assert_eq!("t:55ms dn:Escape up:Escape", result);
}
