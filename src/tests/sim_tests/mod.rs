use crate::tests::*;
use crate::{boards, sim};

mod capsword_sim_tests;
mod combo_sim_tests;
mod layer_sim_tests;
mod leader_sim_tests;
mod numword_sim_tests;
mod oneshot_tests;
mod override_tests;
mod tap_hold_proptests;
mod tap_hold_tests;

fn simulate(board: &str, sim: &str) -> String {
    init_log();
    let _lk = match SIM_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let mut ctx = boards::load_by_name(board).expect("board loads");
    let out = sim::simulate(&mut ctx, sim)
        .unwrap_or_else(|e| panic!("{:?}", sim::error_with_source(e, "sim", sim)));
    assert!(ctx.is_idle(), "events left undecided after: {sim}");
    out
}
