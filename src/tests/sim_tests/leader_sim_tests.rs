use super::*;

#[test]
fn sim_leader_sequence_types_assign() {
    let result = simulate(
        "mitosis",
        "d:g d:b t:10 u:g u:b t:10 d:a t:60 u:a t:10 d:s t:60 u:s",
    );
    assert_eq!(
        "t:140ms dn:LShift dn:SColon up:SColon up:LShift dn:Equal up:Equal",
        result
    );
}

#[test]
fn sim_leader_unknown_sequence_is_swallowed() {
    let result = simulate("mitosis", "d:g d:b t:10 u:g u:b t:10 d:o u:o t:10 d:o u:o");
    assert_eq!("t:30ms dn:O up:O", result);
}

#[test]
fn sim_leader_times_out() {
    let result = simulate("mitosis", "d:g d:b t:10 u:g u:b t:300 d:o u:o");
    assert_eq!("t:310ms dn:O up:O", result);
}
