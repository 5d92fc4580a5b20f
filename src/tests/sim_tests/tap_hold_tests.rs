use super::*;

#[test]
fn sim_home_row_tap() {
    let result = simulate("mitosis", "d:j t:50 u:j t:10");
    assert_eq!("t:50ms dn:J up:J", result);
}

#[test]
fn sim_home_row_hold_on_timeout() {
    let result = simulate("mitosis", "d:j t:200 u:j");
    assert_eq!("t:185ms dn:RShift t:15ms up:RShift", result);
}

#[test]
fn sim_opposite_hand_press_is_hold() {
    let result = simulate("mitosis", "d:f t:50 d:o t:20 u:o t:10 u:f");
    assert_eq!("t:50ms dn:LShift dn:O t:20ms up:O t:10ms up:LShift", result);
    let result = simulate("corne", "d:f t:50 d:o u:o t:10 u:f");
    assert_eq!("t:50ms dn:LShift dn:O up:O t:10ms up:LShift", result);
}

#[test]
fn sim_same_hand_press_is_tap() {
    let result = simulate("mitosis", "d:f t:50 d:e t:20 u:e t:10 u:f");
    assert_eq!("t:50ms dn:F dn:E t:20ms up:E t:10ms up:F", result);
}

#[test]
fn sim_thumb_space_is_held_by_permissive_hold() {
    // Space may hold with a key on its own hand, so the nested tap decides.
    let result = simulate("mitosis", "d:spc t:30 d:w t:20 u:w t:20 u:spc");
    assert_eq!("t:50ms dn:LShift dn:Kb4 up:Kb4 up:LShift", result);
}

#[test]
fn sim_layer_tap_timeout_then_key() {
    let result = simulate("mitosis", "d:spc t:150 d:o u:o t:10 u:spc");
    assert_eq!("t:150ms dn:SColon up:SColon", result);
}

#[test]
fn sim_flow_tap_right_after_typing() {
    let result = simulate("mitosis", "d:o t:20 u:o t:30 d:f t:50 u:f");
    assert_eq!("dn:O t:20ms up:O t:60ms dn:F t:20ms up:F", result);
}

#[test]
fn sim_no_flow_tap_after_a_pause() {
    let result = simulate("mitosis", "d:o t:20 u:o t:300 d:f t:50 u:f");
    assert_eq!("dn:O t:20ms up:O t:350ms dn:F up:F", result);
}

#[test]
fn sim_quick_tap_repeats_the_tap() {
    let result = simulate("mitosis", "d:f t:170 u:f t:50 d:f t:300 u:f");
    assert_eq!("t:170ms dn:F up:F t:80ms dn:F t:270ms up:F", result);
}

#[test]
fn sim_planck_has_no_flow_tap() {
    let result = simulate("planck", "d:o u:o d:f t:30 d:h u:h t:10 u:f");
    assert_eq!("dn:O up:O t:30ms dn:LShift dn:H up:H t:10ms up:LShift", result);
}

#[test]
fn sim_planck_has_no_quick_tap() {
    let result = simulate("planck", "d:f t:100 u:f t:20 d:f t:200 u:f");
    assert_eq!("t:100ms dn:F up:F t:195ms dn:LShift t:25ms up:LShift", result);
}
