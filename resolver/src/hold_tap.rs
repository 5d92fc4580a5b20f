//! Tap-hold resolution for dual-role keys.

use crate::action::HoldTapAction;
use crate::config::{hand_of, ResolverConfig, ResolverHooks};
use crate::event::{Event, KCoord, Queue, QUEUE_SIZE};

/// Whether a dual-role key acts as its tap or its hold action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Tap,
    Hold,
}

/// The rule that settled a dual-role key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Released inside the window.
    Released,
    /// Held for the whole window.
    Timeout,
    /// A key on the same hand was pressed.
    SameHand,
    /// A key on the other hand was pressed.
    OppositeHand,
    /// A key pressed after it was also released.
    Permissive,
    /// Pressed right after another fast-typing key.
    FlowTap,
    /// Pressed again right after being tapped.
    QuickTap,
}

/// A key pressed while a dual-role key waits, as the decision sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Interrupt {
    /// The physical key whose hand counts. For a combo this is one of its
    /// members if they are all on one hand.
    pub(crate) coord: KCoord,
    /// The key is itself a dual-role key on the active layers.
    pub(crate) dual_role: bool,
}

/// A dual-role key that is pressed and not yet settled.
#[derive(Debug, Clone)]
pub(crate) struct PendingDualRole {
    pub(crate) coord: KCoord,
    pub(crate) action: HoldTapAction,
    /// Milliseconds since the key was pressed.
    pub(crate) ticks: u16,
}

impl PendingDualRole {
    /// `delay` is how long the press already waited before reaching the
    /// resolver, e.g. while a combo was possible.
    pub(crate) fn new(coord: KCoord, action: HoldTapAction, delay: u16) -> Self {
        Self {
            coord,
            action,
            ticks: delay,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Looks at the events queued since the press, in order, each at its
    /// own offset from the press. Returns `None` while undecided.
    ///
    /// A same-hand press only makes a tap if the other key is not dual-role
    /// too; two held home row mods on one hand are both modifiers.
    pub(crate) fn decide<H, F>(
        &self,
        queued: &Queue,
        cfg: &ResolverConfig,
        hooks: &H,
        interrupt: F,
    ) -> Option<(Decision, Reason)>
    where
        H: ResolverHooks + ?Sized,
        F: Fn(KCoord) -> Interrupt,
    {
        let timeout = self.action.timeout;
        let mut pressed_after = heapless::Vec::<KCoord, QUEUE_SIZE>::new();
        for q in queued.iter() {
            let at = self.ticks.saturating_sub(q.since);
            if at >= timeout {
                return Some((Decision::Hold, Reason::Timeout));
            }
            match q.event {
                Event::Release(i, j) if (i, j) == self.coord => {
                    return Some((Decision::Tap, Reason::Released));
                }
                Event::Press(i, j) => {
                    let other = interrupt((i, j));
                    if cfg.chordal_hold {
                        if !hooks.chordal_hold(cfg, self.coord, &self.action, other.coord) {
                            if !other.dual_role {
                                return Some((Decision::Tap, Reason::SameHand));
                            }
                        } else if hand_of(hooks, self.coord).opposes(hand_of(hooks, other.coord)) {
                            return Some((Decision::Hold, Reason::OppositeHand));
                        }
                    }
                    let _ = pressed_after.push((i, j));
                }
                Event::Release(i, j) => {
                    if cfg.permissive_hold && pressed_after.contains(&(i, j)) {
                        return Some((Decision::Hold, Reason::Permissive));
                    }
                }
            }
        }
        (self.ticks >= timeout).then_some((Decision::Hold, Reason::Timeout))
    }
}
