//! The resolver pipeline: combos, then dual-role keys, then layers and
//! dispatch.

use crate::action::{HoldTapAction, LogicalAction};
use crate::combo::{self, ComboDetector, ComboSpec};
use crate::config::{Hand, ResolverConfig, ResolverHooks};
use crate::dispatch::{Action, Dispatcher};
use crate::error::ConfigError;
use crate::event::{Event, KCoord, Queue, Queued, COMBO_ROW};
use crate::hold_tap::{Decision, Interrupt, PendingDualRole, Reason};
use crate::key_code::KeyCode;
use crate::layers::{Layer, LayerState, LayerTable, NO_OP};

/// Everything a board declares.
#[derive(Debug, Clone)]
pub struct Keymap {
    pub layers: Vec<Layer>,
    pub combos: Vec<ComboSpec>,
    pub config: ResolverConfig,
}

/// The last dual-role key that resolved as a tap.
#[derive(Debug, Copy, Clone)]
struct LastTap {
    coord: KCoord,
    released_at: Option<u64>,
}

/// All resolution state of one keyboard.
///
/// Feed key events with [`event`](Self::event) and move time forward with
/// [`tick`](Self::tick), which returns what the host should see.
pub struct ResolverContext<H: ResolverHooks> {
    table: LayerTable,
    config: ResolverConfig,
    hooks: H,
    layer_state: LayerState,
    combos: ComboDetector,
    /// Events the combo detector passed on, waiting for dual-role keys.
    queue: Queue,
    waiting: Option<PendingDualRole>,
    dispatcher: Dispatcher,
    now: u64,
    /// Tap key code and time of the previous press, for flow tap.
    last_press: Option<(Option<KeyCode>, u64)>,
    last_tap: Option<LastTap>,
}

impl<H: ResolverHooks> ResolverContext<H> {
    pub fn new(keymap: Keymap, hooks: H) -> Result<Self, ConfigError> {
        let Keymap {
            layers,
            combos,
            config,
        } = keymap;
        let table = LayerTable::new(layers)?;
        let combos = combo::resolve(combos, &table, &config.combo_terms)?;
        let dispatcher = Dispatcher::new(&config)?;
        log::debug!(
            "resolver ready: {} layers, {} combos",
            table.len(),
            combos.len()
        );
        Ok(Self {
            table,
            layer_state: LayerState::new(config.tri_layer),
            combos: ComboDetector::new(combos, config.combo_hold_term),
            queue: Queue::new(),
            waiting: None,
            dispatcher,
            now: 0,
            last_press: None,
            last_tap: None,
            config,
            hooks,
        })
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn layer_state(&self) -> &LayerState {
        &self.layer_state
    }

    pub fn layers(&self) -> &LayerTable {
        &self.table
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The keys the host sees as held.
    pub fn active_keys(&self) -> &[KeyCode] {
        self.dispatcher.active_keys()
    }

    pub fn caps_word_active(&self) -> bool {
        self.dispatcher.caps_word_active()
    }

    pub fn num_word_active(&self) -> bool {
        self.dispatcher.num_word_active()
    }

    pub fn leader_active(&self) -> bool {
        self.dispatcher.leader_active()
    }

    /// Returns `true` if no event is waiting for a decision.
    pub fn is_idle(&self) -> bool {
        self.combos.is_idle() && self.queue.is_empty() && self.waiting.is_none()
    }

    /// Registers a key event at the current time.
    pub fn event(&mut self, event: Event) {
        log::trace!("{}ms {event:?}", self.now);
        let (hooks, layer_state) = (&self.hooks, &self.layer_state);
        let eligible = |spec: &ComboSpec| hooks.combo_should_trigger(spec, layer_state);
        self.combos
            .event(Queued::from(event), &eligible, &mut self.queue);
    }

    /// Advances time to `now`, resolving whatever can be decided on the way.
    /// Earlier times than the current one are ignored.
    pub fn tick(&mut self, now: u64) -> Vec<Action> {
        self.process();
        while self.now < now {
            if self.is_idle() {
                let next = self
                    .dispatcher
                    .next_deadline()
                    .map_or(now, |d| d.clamp(self.now + 1, now));
                self.now = next;
                self.dispatcher
                    .tick(self.now, &mut self.layer_state, &self.config);
                continue;
            }
            self.step();
        }
        self.dispatcher.take_actions()
    }

    fn step(&mut self) {
        self.now += 1;
        self.combos.tick();
        self.queue.iter_mut().for_each(Queued::tick);
        if let Some(waiting) = &mut self.waiting {
            waiting.tick();
        }
        self.dispatcher
            .tick(self.now, &mut self.layer_state, &self.config);
        self.process();
    }

    /// Settles everything that can be settled at the current time.
    fn process(&mut self) {
        let (hooks, layer_state) = (&self.hooks, &self.layer_state);
        let eligible = |spec: &ComboSpec| hooks.combo_should_trigger(spec, layer_state);
        self.combos.settle(&eligible, &mut self.queue);
        loop {
            if let Some(waiting) = &self.waiting {
                let (table, combos, state) = (&self.table, &self.combos, &self.layer_state);
                let Some((decision, reason)) =
                    waiting.decide(&self.queue, &self.config, &self.hooks, |coord| {
                        interrupt(table, combos, state, &self.hooks, coord)
                    })
                else {
                    break;
                };
                self.settle_waiting(decision, reason);
            } else if let Some(q) = self.queue.pop_front() {
                self.dequeue(q);
            } else {
                break;
            }
        }
    }

    fn settle_waiting(&mut self, decision: Decision, reason: Reason) {
        let Some(waiting) = self.waiting.take() else {
            return;
        };
        log::debug!(
            "{}ms {:?} is {decision:?} ({reason:?})",
            self.now,
            waiting.coord
        );
        self.press_resolved(waiting.coord, &waiting.action, decision);
    }

    fn press_resolved(&mut self, coord: KCoord, action: &HoldTapAction, decision: Decision) {
        let resolved = match decision {
            Decision::Tap => {
                self.last_tap = Some(LastTap {
                    coord,
                    released_at: None,
                });
                &action.tap
            }
            Decision::Hold => {
                self.last_tap = None;
                // a held modifier does not start a flow of taps
                self.last_press = None;
                &action.hold
            }
        };
        self.dispatch_press(coord, resolved);
    }

    fn dequeue(&mut self, q: Queued) {
        let coord = q.event.coord();
        let at = self.now.saturating_sub(u64::from(q.since));
        match q.event {
            Event::Release(..) => {
                if let Some(tap) = &mut self.last_tap {
                    if tap.coord == coord && tap.released_at.is_none() {
                        tap.released_at = Some(at);
                    }
                }
                let bits = self.layer_state.bits();
                self.dispatcher
                    .release(coord, self.now, &mut self.layer_state, &self.config);
                self.log_layer_change(bits);
            }
            Event::Press(..) => {
                let action = lookup(&self.table, &self.combos, &self.layer_state, coord);
                let prev = self.last_press.replace((action.tap_keycode(), at));
                if self.last_tap.is_some_and(|tap| tap.coord != coord) {
                    self.last_tap = None;
                }
                match action {
                    LogicalAction::HoldTap(ht) => {
                        let ht = (**ht).clone();
                        self.press_dual_role(coord, ht, q.since, at, prev);
                    }
                    _ => {
                        let bits = self.layer_state.bits();
                        self.dispatcher.press(
                            coord,
                            action,
                            self.now,
                            &mut self.layer_state,
                            &self.config,
                        );
                        self.log_layer_change(bits);
                    }
                }
            }
        }
    }

    fn press_dual_role(
        &mut self,
        coord: KCoord,
        ht: HoldTapAction,
        since: u16,
        at: u64,
        prev: Option<(Option<KeyCode>, u64)>,
    ) {
        if let Some((prev_kc, prev_at)) = prev {
            let term = self.hooks.flow_tap_term(
                &self.config,
                ht.tap_keycode(),
                prev_kc,
                self.dispatcher.mods(),
            );
            if term > 0 && at.saturating_sub(prev_at) < u64::from(term) {
                log::debug!("{}ms {coord:?} is Tap ({:?})", self.now, Reason::FlowTap);
                self.press_resolved(coord, &ht, Decision::Tap);
                return;
            }
        }
        let quick_tap_term = self.config.quick_tap_term.unwrap_or(0);
        if let Some(LastTap {
            coord: tapped,
            released_at: Some(released_at),
        }) = self.last_tap
        {
            if tapped == coord && at.saturating_sub(released_at) < u64::from(quick_tap_term) {
                log::debug!("{}ms {coord:?} is Tap ({:?})", self.now, Reason::QuickTap);
                self.press_resolved(coord, &ht, Decision::Tap);
                return;
            }
        }
        self.waiting = Some(PendingDualRole::new(coord, ht, since));
    }

    fn dispatch_press(&mut self, coord: KCoord, action: &LogicalAction) {
        let bits = self.layer_state.bits();
        self.dispatcher
            .press(coord, action, self.now, &mut self.layer_state, &self.config);
        self.log_layer_change(bits);
    }

    fn log_layer_change(&self, before: u32) {
        let after = self.layer_state.bits();
        if after != before {
            log::debug!(
                "{}ms layers {:?} -> highest {}",
                self.now,
                self.layer_state.active_layers().collect::<Vec<_>>(),
                self.layer_state.highest()
            );
        }
    }
}

/// The action of a physical or virtual combo key.
fn lookup<'a>(
    table: &'a LayerTable,
    combos: &'a ComboDetector,
    state: &LayerState,
    coord: KCoord,
) -> &'a LogicalAction {
    if coord.0 == COMBO_ROW {
        combos.action(coord.1).unwrap_or(&NO_OP)
    } else {
        table.action_at(coord, state)
    }
}

/// How a press counts for the waiting dual-role key.
fn interrupt<H: ResolverHooks>(
    table: &LayerTable,
    combos: &ComboDetector,
    state: &LayerState,
    hooks: &H,
    coord: KCoord,
) -> Interrupt {
    if coord.0 != COMBO_ROW {
        return Interrupt {
            coord,
            dual_role: table.action_at(coord, state).is_hold_tap(),
        };
    }
    let one_hand = combos.members(coord.1).and_then(|members| {
        let (&first, rest) = members.split_first()?;
        let hand = hooks.hand(first);
        (hand != Hand::Any && rest.iter().all(|c| hooks.hand(*c) == hand)).then_some(first)
    });
    Interrupt {
        coord: one_hand.unwrap_or(coord),
        dual_role: false,
    }
}
