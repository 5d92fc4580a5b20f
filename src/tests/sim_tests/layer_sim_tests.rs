use super::*;
use indoc::indoc;

#[test]
fn sim_tri_layer_reaches_adjust() {
    let result = simulate(
        "mitosis",
        "d:spc t:150 d:ent t:150 d:t u:t u:ent u:spc",
    );
    assert_eq!("t:300ms dn:CapsLock up:CapsLock", result);
}

#[test]
fn sim_bootloader_from_adjust() {
    let result = simulate(
        "mitosis",
        "d:spc t:150 d:ent t:150 d:lctl t:10 u:lctl u:ent u:spc",
    );
    assert_eq!("t:300ms sys:Bootloader", result);
}

#[test]
fn sim_combo_moves_to_vim_and_back() {
    let result = simulate(
        "mitosis",
        indoc! {"
            d:n d:m d:, t:10 u:n u:m u:, t:10
            d:f t:200 u:f t:10
            d:q d:w d:e t:10 u:q u:w u:e t:10
            d:f t:200 u:f
        "},
    );
    assert_eq!(
        "t:50ms dn:F t:170ms up:F t:215ms dn:LShift t:15ms up:LShift",
        result
    );
}

#[test]
fn sim_kyria_one_shot_layer() {
    let result = simulate("kyria", "d:3,7 u:3,7 t:10 d:h u:h d:h u:h");
    assert_eq!("t:10ms dn:Left up:Left dn:H up:H", result);
}

#[test]
fn sim_zima_toggles() {
    let result = simulate(
        "zima",
        indoc! {"
            d:kp7 u:kp7
            d:0,1 u:0,1 d:kp8 u:kp8
            d:0,2 u:0,2 d:kp1 u:kp1
        "},
    );
    assert_eq!(
        "dn:Kp7 up:Kp7 dn:MediaPlayPause up:MediaPlayPause sys:Bootloader",
        result
    );
}
