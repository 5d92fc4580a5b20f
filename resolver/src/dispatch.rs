//! Turns settled actions into host key events.
//!
//! The dispatcher keeps one state per held key. After every press and
//! release the set of host keys is recomputed from these states plus the
//! word modes and one-shot modifiers, and compared against the previous set.
//! Only the difference is sent to the host.

use crate::action::{CustomAction, LayerId, LayerMode, LogicalAction, MacroStep, SystemAction};
use crate::caps_word::{CapsWordNextState, CapsWordState};
use crate::config::ResolverConfig;
use crate::error::ConfigError;
use crate::event::KCoord;
use crate::key_code::{KeyCode, Mods};
use crate::key_override::override_keys;
use crate::layers::LayerState;
use crate::leader::{build_trie, LeaderState, LeaderStep, LeaderTrie};
use crate::num_word::NumWordState;

/// Output of the resolver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Press(KeyCode),
    Release(KeyCode),
    System(SystemAction),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    NormalKey { keycode: KeyCode, coord: KCoord },
    LayerModifier { layer: LayerId, coord: KCoord },
    /// `used` is set once another key is pressed while this one is held.
    OneShotMod {
        keycode: KeyCode,
        coord: KCoord,
        used: bool,
    },
    OneShotLayer {
        layer: LayerId,
        coord: KCoord,
        used: bool,
    },
}

impl State {
    fn coord(&self) -> KCoord {
        match *self {
            State::NormalKey { coord, .. }
            | State::LayerModifier { coord, .. }
            | State::OneShotMod { coord, .. }
            | State::OneShotLayer { coord, .. } => coord,
        }
    }

    fn keycode(&self) -> Option<KeyCode> {
        match *self {
            State::NormalKey { keycode, .. } | State::OneShotMod { keycode, .. } => Some(keycode),
            _ => None,
        }
    }
}

/// One-shot modifiers and layers that were tapped and wait for the next key.
#[derive(Debug, Default)]
struct OneShots {
    armed: Vec<KeyCode>,
    locked: Vec<KeyCode>,
    /// The modifier tapped last and how many times in a row.
    streak: Option<(KeyCode, u8)>,
    layer: Option<LayerId>,
    deadline: Option<u64>,
}

pub(crate) struct Dispatcher {
    states: Vec<State>,
    one_shots: OneShots,
    caps_word: Option<CapsWordState>,
    num_word: Option<NumWordState>,
    leader: Option<LeaderState>,
    leader_trie: LeaderTrie,
    prev_keys: Vec<KeyCode>,
    outbox: Vec<Action>,
}

impl Dispatcher {
    pub(crate) fn new(cfg: &ResolverConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            states: vec![],
            one_shots: OneShots::default(),
            caps_word: None,
            num_word: None,
            leader: None,
            leader_trie: build_trie(&cfg.leader_sequences)?,
            prev_keys: vec![],
            outbox: vec![],
        })
    }

    /// The keys the host currently sees as held.
    pub(crate) fn active_keys(&self) -> &[KeyCode] {
        &self.prev_keys
    }

    pub(crate) fn mods(&self) -> Mods {
        Mods::from_keys(self.prev_keys.iter().copied())
    }

    pub(crate) fn caps_word_active(&self) -> bool {
        self.caps_word.is_some()
    }

    pub(crate) fn num_word_active(&self) -> bool {
        self.num_word.is_some()
    }

    pub(crate) fn leader_active(&self) -> bool {
        self.leader.is_some()
    }

    pub(crate) fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.outbox)
    }

    /// The earliest time at which a timer expires.
    pub(crate) fn next_deadline(&self) -> Option<u64> {
        [
            self.caps_word.as_ref().map(CapsWordState::deadline),
            self.num_word.as_ref().map(NumWordState::deadline),
            self.leader.as_ref().map(LeaderState::deadline),
            self.one_shots.deadline,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub(crate) fn press(
        &mut self,
        coord: KCoord,
        action: &LogicalAction,
        now: u64,
        layers: &mut LayerState,
        cfg: &ResolverConfig,
    ) {
        if self.leader_captures(action, now, cfg) {
            self.report(cfg);
            return;
        }
        match action {
            LogicalAction::NoOp | LogicalAction::Trans => {}
            LogicalAction::KeyCode(kc) => {
                self.press_keys(std::slice::from_ref(kc), coord, now, layers, cfg)
            }
            LogicalAction::MultipleKeyCodes(kcs) => self.press_keys(kcs, coord, now, layers, cfg),
            LogicalAction::Layer(layer, mode) => self.press_layer(*layer, *mode, coord, layers),
            LogicalAction::OneShotMod(keycode) => self.states.push(State::OneShotMod {
                keycode: *keycode,
                coord,
                used: false,
            }),
            LogicalAction::Macro(steps) => {
                self.mark_one_shots_used();
                self.run_macro(steps, now, cfg);
            }
            LogicalAction::HoldTap(ht) => {
                log::warn!("unsettled dual-role key at {coord:?}, using its tap");
                self.press(coord, &ht.tap, now, layers, cfg);
                return;
            }
            LogicalAction::Custom(custom) => self.press_custom(*custom, now, layers, cfg),
        }
        self.report(cfg);
    }

    pub(crate) fn release(
        &mut self,
        coord: KCoord,
        now: u64,
        layers: &mut LayerState,
        cfg: &ResolverConfig,
    ) {
        let mut i = 0;
        while i < self.states.len() {
            if self.states[i].coord() != coord {
                i += 1;
                continue;
            }
            match self.states.remove(i) {
                State::NormalKey { .. } => {}
                State::LayerModifier { layer, .. } => layers.release_momentary(layer),
                State::OneShotMod { keycode, used, .. } => {
                    if !used {
                        self.tap_one_shot(keycode, now, cfg);
                    }
                }
                State::OneShotLayer { layer, used, .. } => {
                    if used {
                        layers.set_one_shot(layer, false);
                    } else {
                        log::debug!("one-shot layer {layer} armed");
                        self.one_shots.layer = Some(layer);
                        self.one_shots.deadline = cfg.one_shot_timeout.map(|t| now + u64::from(t));
                    }
                }
            }
        }
        self.report(cfg);
    }

    /// Ends the modes whose timers ran out.
    pub(crate) fn tick(&mut self, now: u64, layers: &mut LayerState, cfg: &ResolverConfig) {
        if self.caps_word.as_ref().is_some_and(|cw| cw.is_expired(now)) {
            log::debug!("caps-word timed out");
            self.caps_word = None;
        }
        if self.num_word.as_ref().is_some_and(|nw| nw.is_expired(now)) {
            log::debug!("num-word timed out");
            self.end_num_word(layers);
        }
        if self.leader.as_ref().is_some_and(|l| l.is_expired(now)) {
            log::debug!("leader timed out");
            self.leader = None;
        }
        if self.one_shots.deadline.is_some_and(|d| now >= d) {
            log::debug!("one-shots timed out");
            self.one_shots.armed.clear();
            self.one_shots.streak = None;
            self.one_shots.deadline = None;
            if let Some(layer) = self.one_shots.layer.take() {
                layers.set_one_shot(layer, false);
            }
        }
        self.report(cfg);
    }

    fn press_keys(
        &mut self,
        kcs: &[KeyCode],
        coord: KCoord,
        now: u64,
        layers: &mut LayerState,
        cfg: &ResolverConfig,
    ) {
        let typing = kcs.iter().any(|kc| !kc.is_modifier());
        if typing {
            if let Some(cw) = &mut self.caps_word {
                if cw.press(kcs, now) == CapsWordNextState::End {
                    self.caps_word = None;
                }
            }
        }
        for kc in kcs {
            self.states.push(State::NormalKey { keycode: *kc, coord });
        }
        if typing {
            self.mark_one_shots_used();
            self.consume_one_shots(coord, layers);
            if let Some(nw) = &mut self.num_word {
                if !nw.press(kcs, now) {
                    self.end_num_word(layers);
                }
            }
        } else if cfg.both_shifts_caps_word && self.caps_word.is_none() && self.both_shifts_held()
        {
            log::debug!("caps-word on from both shifts");
            self.caps_word = Some(CapsWordState::new(cfg.caps_word_idle_timeout, now));
        }
    }

    fn both_shifts_held(&self) -> bool {
        let held = |kc| {
            self.states
                .iter()
                .any(|s| matches!(s, State::NormalKey { keycode, .. } if *keycode == kc))
        };
        held(KeyCode::LShift) && held(KeyCode::RShift)
    }

    fn press_layer(&mut self, layer: LayerId, mode: LayerMode, coord: KCoord, layers: &mut LayerState) {
        match mode {
            LayerMode::Momentary => {
                layers.press_momentary(layer);
                self.states.push(State::LayerModifier { layer, coord });
            }
            LayerMode::Toggle => layers.toggle(layer),
            LayerMode::Move => {
                layers.move_to(layer);
                self.one_shots.layer = None;
                self.num_word = None;
            }
            LayerMode::OneShot => {
                layers.set_one_shot(layer, true);
                self.states.push(State::OneShotLayer {
                    layer,
                    coord,
                    used: false,
                });
            }
        }
        log::debug!("layers: {:#034b}", layers.bits());
    }

    fn press_custom(
        &mut self,
        custom: CustomAction,
        now: u64,
        layers: &mut LayerState,
        cfg: &ResolverConfig,
    ) {
        match custom {
            CustomAction::CapsWordToggle => {
                self.caps_word = match self.caps_word {
                    Some(_) => None,
                    None => Some(CapsWordState::new(cfg.caps_word_idle_timeout, now)),
                };
                log::debug!("caps-word: {}", self.caps_word.is_some());
            }
            CustomAction::NumWordToggle => {
                if self.num_word.is_some() {
                    self.end_num_word(layers);
                } else {
                    log::debug!("num-word on");
                    layers.set_locked(cfg.num_word_layer, true);
                    self.num_word = Some(NumWordState::new(
                        cfg.num_word_layer,
                        cfg.num_word_idle_timeout,
                        now,
                    ));
                }
            }
            CustomAction::Leader => {
                log::debug!("leader on");
                self.leader = Some(LeaderState::new(now, cfg.leader_timeout));
            }
            CustomAction::System(system) => self.outbox.push(Action::System(system)),
        }
    }

    fn end_num_word(&mut self, layers: &mut LayerState) {
        if let Some(nw) = self.num_word.take() {
            log::debug!("num-word off");
            layers.set_locked(nw.layer, false);
        }
    }

    /// While a leader sequence is open, typing keys feed it instead of the
    /// host. Returns `true` if the press was taken.
    fn leader_captures(&mut self, action: &LogicalAction, now: u64, cfg: &ResolverConfig) -> bool {
        let Some(leader) = &mut self.leader else {
            return false;
        };
        let Some(kc) = action.tap_keycode().filter(|kc| !kc.is_modifier()) else {
            return false;
        };
        match leader.push(kc, now, cfg.leader_timeout, &self.leader_trie) {
            LeaderStep::Pending => {}
            LeaderStep::Done(steps) => {
                self.leader = None;
                self.run_macro(&steps, now, cfg);
            }
            LeaderStep::NoMatch => {
                log::debug!("no leader sequence for {kc:?}");
                self.leader = None;
            }
        }
        true
    }

    /// Keys the host already holds stay held: pressing or releasing them is
    /// skipped and tapping one re-presses it.
    fn run_macro(&mut self, steps: &[MacroStep], now: u64, cfg: &ResolverConfig) {
        for step in steps {
            match *step {
                MacroStep::Press(kc) | MacroStep::Release(kc) if self.prev_keys.contains(&kc) => {}
                MacroStep::Press(kc) => self.outbox.push(Action::Press(kc)),
                MacroStep::Release(kc) => self.outbox.push(Action::Release(kc)),
                MacroStep::Tap(kc) if self.prev_keys.contains(&kc) => {
                    self.outbox.push(Action::Release(kc));
                    self.outbox.push(Action::Press(kc));
                }
                MacroStep::Tap(kc) => {
                    self.outbox.push(Action::Press(kc));
                    self.outbox.push(Action::Release(kc));
                }
                MacroStep::OneShot(kc) => self.arm_one_shot(kc, now, cfg),
            }
        }
    }

    fn mark_one_shots_used(&mut self) {
        for state in self.states.iter_mut() {
            match state {
                State::OneShotMod { used, .. } | State::OneShotLayer { used, .. } => *used = true,
                _ => {}
            }
        }
    }

    /// Attaches the armed modifiers to the key at `coord`, so they are
    /// released with it, and drops an armed one-shot layer.
    fn consume_one_shots(&mut self, coord: KCoord, layers: &mut LayerState) {
        for keycode in self.one_shots.armed.drain(..) {
            self.states.push(State::NormalKey { keycode, coord });
        }
        self.one_shots.streak = None;
        self.one_shots.deadline = None;
        if let Some(layer) = self.one_shots.layer.take() {
            layers.set_one_shot(layer, false);
        }
    }

    /// A one-shot modifier was released without another key being pressed.
    fn tap_one_shot(&mut self, kc: KeyCode, now: u64, cfg: &ResolverConfig) {
        let os = &mut self.one_shots;
        if let Some(pos) = os.locked.iter().position(|k| *k == kc) {
            log::debug!("one-shot {kc:?} unlocked");
            os.locked.remove(pos);
            os.streak = None;
            return;
        }
        let count = match os.streak {
            Some((k, n)) if k == kc => n.saturating_add(1),
            _ => 1,
        };
        if cfg.one_shot_tap_toggle.is_some_and(|n| count >= n) {
            log::debug!("one-shot {kc:?} locked");
            os.armed.retain(|k| *k != kc);
            os.locked.push(kc);
            os.streak = None;
        } else {
            os.streak = Some((kc, count));
            self.arm_one_shot(kc, now, cfg);
        }
    }

    fn arm_one_shot(&mut self, kc: KeyCode, now: u64, cfg: &ResolverConfig) {
        log::debug!("one-shot {kc:?} armed");
        if !self.one_shots.armed.contains(&kc) {
            self.one_shots.armed.push(kc);
        }
        self.one_shots.deadline = cfg.one_shot_timeout.map(|t| now + u64::from(t));
    }

    fn current_keys(&self, cfg: &ResolverConfig) -> Vec<KeyCode> {
        let mut keys = Vec::with_capacity(self.states.len() + 2);
        let one_shots = self.one_shots.armed.iter().chain(self.one_shots.locked.iter());
        for kc in self.states.iter().filter_map(State::keycode).chain(one_shots.copied()) {
            if !keys.contains(&kc) {
                keys.push(kc);
            }
        }
        if let Some(cw) = &self.caps_word {
            cw.maybe_add_lsft(&mut keys);
        }
        override_keys(&cfg.key_overrides, &mut keys);
        keys
    }

    /// Sends the difference between the previous and the current key set.
    /// Keys are released before new ones are pressed; modifiers are released
    /// last and pressed first.
    fn report(&mut self, cfg: &ResolverConfig) {
        let cur = self.current_keys(cfg);
        let (prev_mods, prev_keys): (Vec<KeyCode>, Vec<KeyCode>) =
            self.prev_keys.iter().partition(|kc| kc.is_modifier());
        for kc in prev_keys.into_iter().chain(prev_mods) {
            if !cur.contains(&kc) {
                self.outbox.push(Action::Release(kc));
            }
        }
        let (cur_mods, cur_keys): (Vec<KeyCode>, Vec<KeyCode>) =
            cur.iter().partition(|kc| kc.is_modifier());
        for kc in cur_mods.into_iter().chain(cur_keys) {
            if !self.prev_keys.contains(&kc) {
                self.outbox.push(Action::Press(kc));
            }
        }
        self.prev_keys = cur;
    }
}
