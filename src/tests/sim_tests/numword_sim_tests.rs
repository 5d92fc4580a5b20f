use super::*;

#[test]
fn sim_numword_ends_on_letter() {
    let result = simulate(
        "mitosis",
        "d:y d:h t:10 u:y u:h t:10 d:j t:10 u:j d:k t:10 u:k d:x t:40 u:x t:10 d:o u:o",
    );
    assert_eq!(
        "t:20ms dn:Kb4 t:10ms up:Kb4 dn:Kb5 t:10ms up:Kb5 t:40ms dn:X up:X \
         t:10ms dn:O up:O",
        result
    );
}

#[test]
fn sim_numword_times_out() {
    let result = simulate("mitosis", "d:y d:h t:10 u:y u:h t:3000 d:o u:o");
    assert_eq!("t:3010ms dn:O up:O", result);
}
