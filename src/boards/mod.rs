//! Keyboards with their layers, combos and configuration.
//!
//! A board is a value implementing [`Board`]. It is handed to the resolver
//! as its [`ResolverHooks`], so the per-board decisions such as which hand
//! a key belongs to are plain method overrides.

use anyhow::{anyhow, Context, Result};
use homerow_resolver::{Keymap, ResolverContext, ResolverHooks};

pub mod corne;
pub mod kyria;
pub mod mitosis;
pub mod planck;
pub mod shared;
pub mod zima;

pub trait Board: ResolverHooks {
    fn name(&self) -> &'static str;

    /// Builds the full layer table, combos and configuration.
    fn keymap(&self) -> Keymap;

    fn layer_names(&self) -> &'static [&'static str] {
        &shared::LAYER_NAMES
    }
}

/// A resolver running one of the boards.
pub type BoardContext = ResolverContext<Box<dyn Board>>;

pub fn all() -> Vec<Box<dyn Board>> {
    vec![
        Box::new(mitosis::Mitosis),
        Box::new(corne::Corne),
        Box::new(kyria::Kyria),
        Box::new(planck::Planck),
        Box::new(zima::Zima),
    ]
}

pub fn names() -> Vec<&'static str> {
    all().iter().map(|b| b.name()).collect()
}

pub fn by_name(name: &str) -> Option<Box<dyn Board>> {
    all()
        .into_iter()
        .find(|b| b.name().eq_ignore_ascii_case(name))
}

/// Validates the keymap of `board` and builds a resolver for it.
pub fn load(board: Box<dyn Board>) -> Result<BoardContext> {
    let name = board.name();
    let keymap = board.keymap();
    log::debug!(
        "loading {name}: {} layers, {} combos",
        keymap.layers.len(),
        keymap.combos.len()
    );
    ResolverContext::new(keymap, board).with_context(|| format!("invalid keymap for {name}"))
}

pub fn load_by_name(name: &str) -> Result<BoardContext> {
    let board = by_name(name).ok_or_else(|| {
        anyhow!(
            "unknown board: {name}\nknown boards: {}",
            names().join(", ")
        )
    })?;
    load(board)
}
