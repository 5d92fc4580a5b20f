//! Keyboard configurations for the home row resolver and a simulator that
//! runs key event scripts through them.

use std::path::PathBuf;

pub mod boards;
pub mod sim;

pub use boards::{Board, BoardContext};


/// Simulation scripts used when none are given: `sim.txt` in the working
/// directory and `homerow/sim.txt` in the user's config directory.
pub fn default_sim() -> Vec<PathBuf> {
    let mut sims = Vec::new();

    let default = PathBuf::from("sim.txt");
    if default.is_file() {
        sims.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("homerow").join("sim.txt");
        if fallback.is_file() {
            sims.push(fallback);
        }
    }

    sims
}
