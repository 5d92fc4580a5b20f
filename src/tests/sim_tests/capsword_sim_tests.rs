use super::*;

#[test]
fn sim_capsword_from_combo_until_space() {
    let result = simulate(
        "mitosis",
        "d:h d:j t:10 u:h u:j t:10 d:o u:o d:p u:p d:spc t:10 u:spc d:o u:o",
    );
    assert_eq!(
        "t:20ms dn:LShift dn:O up:O up:LShift dn:LShift dn:P up:P up:LShift \
         t:10ms dn:Space up:Space dn:O up:O",
        result
    );
}

#[test]
fn sim_capsword_times_out() {
    let result = simulate("mitosis", "d:h d:j t:10 u:h u:j t:2100 d:o u:o");
    assert_eq!("t:2110ms dn:O up:O", result);
}
