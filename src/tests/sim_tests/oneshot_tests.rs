use super::*;

#[test]
fn sim_oneshot_shift_applies_to_next_key() {
    let result = simulate("mitosis", "d:3,0 t:20 u:3,0 t:50 d:o t:20 u:o");
    assert_eq!("dn:LShift t:70ms dn:O t:20ms up:O up:LShift", result);
}

#[test]
fn sim_oneshot_shift_from_combo() {
    let result = simulate("mitosis", "d:r d:t t:10 u:r u:t t:20 d:o u:o");
    assert_eq!("dn:LShift t:30ms dn:O up:O up:LShift", result);
}

#[test]
fn sim_kyria_oneshot_times_out() {
    let result = simulate("kyria", "d:3,1 u:3,1 t:600 d:o u:o");
    assert_eq!("dn:LCtrl t:500ms up:LCtrl t:100ms dn:O up:O", result);
}

#[test]
fn sim_kyria_double_tap_locks_oneshot() {
    let result = simulate(
        "kyria",
        "d:3,1 u:3,1 t:10 d:3,1 u:3,1 t:600 d:o u:o t:10 d:3,1 u:3,1 d:o u:o",
    );
    assert_eq!("dn:LCtrl t:610ms dn:O up:O t:10ms up:LCtrl dn:O up:O", result);
}
