use super::*;

#[test]
fn sim_shift_backspace_is_delete() {
    let result = simulate("mitosis", "d:3,0 d:bspc t:10 u:bspc u:3,0");
    assert_eq!(
        "dn:LShift up:LShift dn:Delete t:10ms up:Delete dn:LShift up:LShift",
        result
    );
}

#[test]
fn sim_kyria_has_no_override() {
    let result = simulate("kyria", "d:lsft d:bspc t:10 u:bspc u:lsft");
    assert_eq!("dn:LShift dn:BSpace t:10ms up:BSpace up:LShift", result);
}
