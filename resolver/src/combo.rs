//! Combo detection.
//!
//! Combos are matched by physical position. Each combo names its keys by
//! their base layer actions; these are resolved to coordinates once, so the
//! same chord means the same thing whatever layer is active.
//!
//! Member presses are held back while a combo can still complete. When a
//! combo fires, a press of the virtual coordinate `(COMBO_ROW, index)` is
//! passed on instead of the member presses. When it cannot fire, the held
//! events are passed on unchanged with their original timestamps.

use rustc_hash::FxHashSet as HashSet;

use crate::action::{LayerId, LogicalAction};
use crate::config::ComboTerms;
use crate::error::ConfigError;
use crate::event::{push_logged, Event, KCoord, Queue, Queued, COMBO_ROW};
use crate::layers::{LayerState, LayerTable};

/// The window of a combo: how far apart the first and last member presses
/// may be.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComboTier {
    /// One-shot modifier combos.
    Fast,
    /// The default.
    Medium,
    /// Three key layer switches and combos that need deliberate intent.
    Slow,
    Custom(u16),
}

impl ComboTier {
    pub fn term(self, terms: &ComboTerms) -> u16 {
        match self {
            ComboTier::Fast => terms.fast,
            ComboTier::Medium => terms.medium,
            ComboTier::Slow => terms.slow,
            ComboTier::Custom(term) => term,
        }
    }
}

/// The layers a combo may fire on, tested with
/// [`LayerState::layer_state_is`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerPredicate {
    Always,
    AnyOf(Vec<LayerId>),
    NoneOf(Vec<LayerId>),
}

impl LayerPredicate {
    pub fn allows(&self, layers: &LayerState) -> bool {
        match self {
            LayerPredicate::Always => true,
            LayerPredicate::AnyOf(ids) => ids.iter().any(|l| layers.layer_state_is(*l)),
            LayerPredicate::NoneOf(ids) => !ids.iter().any(|l| layers.layer_state_is(*l)),
        }
    }
}

/// A combo as declared by a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboSpec {
    pub name: &'static str,
    /// Base layer actions of the member keys.
    pub keys: Vec<LogicalAction>,
    pub action: LogicalAction,
    pub tier: ComboTier,
    /// Fire only once all members have been held for the combo hold term.
    pub must_hold: bool,
    pub layers: LayerPredicate,
}

impl ComboSpec {
    pub fn new(
        name: &'static str,
        keys: impl IntoIterator<Item = LogicalAction>,
        action: LogicalAction,
    ) -> Self {
        Self {
            name,
            keys: keys.into_iter().collect(),
            action,
            tier: ComboTier::Medium,
            must_hold: false,
            layers: LayerPredicate::Always,
        }
    }

    pub fn tier(mut self, tier: ComboTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn must_hold(mut self) -> Self {
        self.must_hold = true;
        self
    }

    pub fn on(mut self, layers: LayerPredicate) -> Self {
        self.layers = layers;
        self
    }
}

/// A combo resolved against a layer table.
#[derive(Debug, Clone)]
pub(crate) struct Combo {
    pub(crate) spec: ComboSpec,
    pub(crate) coords: Vec<KCoord>,
    pub(crate) term: u16,
    /// Set when a member is a dual-role key on the base layer: the combo
    /// must then be tapped, since holding the members means their holds.
    pub(crate) must_tap: bool,
}

impl Combo {
    fn covers(&self, buffer: &[Queued]) -> bool {
        buffer
            .iter()
            .all(|q| self.coords.contains(&q.event.coord()))
    }
}

/// Resolves and validates combo declarations.
pub(crate) fn resolve(
    specs: Vec<ComboSpec>,
    layers: &LayerTable,
    terms: &ComboTerms,
) -> Result<Vec<Combo>, ConfigError> {
    let mut combos: Vec<Combo> = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.keys.len() < 2 {
            return Err(ConfigError::ComboTooShort {
                name: spec.name,
                len: spec.keys.len(),
            });
        }
        if spec.action.is_hold_tap() {
            return Err(ConfigError::ComboDualRole { name: spec.name });
        }
        let mut coords = Vec::with_capacity(spec.keys.len());
        for key in spec.keys.iter() {
            let coord = layers
                .find_on_base(key)
                .ok_or_else(|| ConfigError::ComboKeyNotOnBase {
                    name: spec.name,
                    key: format!("{key:?}"),
                })?;
            if coords.contains(&coord) {
                return Err(ConfigError::ComboRepeatedKey { name: spec.name });
            }
            coords.push(coord);
        }
        let key_set: HashSet<KCoord> = coords.iter().copied().collect();
        if let Some(other) = combos.iter().find(|c| {
            c.spec.layers == spec.layers
                && c.coords.len() == coords.len()
                && c.coords.iter().all(|coord| key_set.contains(coord))
        }) {
            return Err(ConfigError::DuplicateCombo {
                name: spec.name,
                other: other.spec.name,
            });
        }
        let must_tap = spec.keys.iter().any(LogicalAction::is_hold_tap);
        combos.push(Combo {
            term: spec.tier.term(terms),
            spec,
            coords,
            must_tap,
        });
    }
    Ok(combos)
}

/// A fired combo whose members are not all released yet.
#[derive(Debug, Clone)]
struct ActiveCombo {
    index: u16,
    held: Vec<KCoord>,
    /// The virtual key is released on the first member release; later member
    /// releases are swallowed.
    released: bool,
}

#[derive(Debug)]
pub(crate) struct ComboDetector {
    combos: Vec<Combo>,
    hold_term: u16,
    /// Member presses, oldest first.
    buffer: Vec<Queued>,
    active: Vec<ActiveCombo>,
    members: HashSet<KCoord>,
}

impl ComboDetector {
    pub(crate) fn new(combos: Vec<Combo>, hold_term: u16) -> Self {
        let members = combos
            .iter()
            .flat_map(|c| c.coords.iter().copied())
            .collect();
        Self {
            combos,
            hold_term,
            buffer: vec![],
            active: vec![],
            members,
        }
    }

    /// The action of the combo at virtual column `index`.
    pub(crate) fn action(&self, index: u16) -> Option<&LogicalAction> {
        self.combos.get(usize::from(index)).map(|c| &c.spec.action)
    }

    /// The member keys of the combo at virtual column `index`.
    pub(crate) fn members(&self, index: u16) -> Option<&[KCoord]> {
        self.combos.get(usize::from(index)).map(|c| c.coords.as_slice())
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.buffer.is_empty()
    }

    pub(crate) fn tick(&mut self) {
        self.buffer.iter_mut().for_each(Queued::tick);
    }

    /// Takes one input event; whatever can be decided now goes to `out`.
    pub(crate) fn event<F>(&mut self, q: Queued, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        self.push(q, eligible, out);
        self.settle(eligible, out);
    }

    /// Resolves the buffer against the current time: fires combos that can
    /// no longer grow and drops combos whose window has passed.
    pub(crate) fn settle<F>(&mut self, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        while let (Some(first), Some(last)) = (self.buffer.first(), self.buffer.last()) {
            let (age, completed_for) = (first.since, last.since);
            match self.complete(eligible) {
                Some(i) if self.combos[i].spec.must_hold => {
                    if completed_for < self.hold_term {
                        return;
                    }
                    self.fire(i, out);
                }
                Some(i) if self.combos[i].must_tap => {
                    if completed_for < self.hold_term {
                        return;
                    }
                    log::debug!("combo {} held too long", self.combos[i].spec.name);
                    self.fall_through(eligible, out);
                }
                Some(i) => {
                    if self.superset_pending(age, eligible) {
                        return;
                    }
                    self.fire(i, out);
                }
                None => {
                    if self.superset_pending(age, eligible) {
                        return;
                    }
                    self.fall_through(eligible, out);
                }
            }
        }
    }

    fn push<F>(&mut self, q: Queued, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        let coord = q.event.coord();
        if self.buffer.is_empty() {
            match q.event {
                Event::Press(..) if self.starts_combo(coord, eligible) => self.buffer.push(q),
                Event::Press(..) => push_logged(out, q),
                Event::Release(..) => self.release_unbuffered(q, out),
            }
            return;
        }
        match q.event {
            Event::Press(..) if self.joins(&q, eligible) => self.buffer.push(q),
            Event::Release(..) if self.is_buffered(coord) => self.member_released(q, eligible, out),
            _ => {
                self.interrupt(eligible, out);
                self.push(q, eligible, out);
            }
        }
    }

    fn starts_combo<F>(&self, coord: KCoord, eligible: &F) -> bool
    where
        F: Fn(&ComboSpec) -> bool,
    {
        self.members.contains(&coord)
            && self
                .combos
                .iter()
                .any(|c| c.coords.contains(&coord) && eligible(&c.spec))
    }

    fn is_buffered(&self, coord: KCoord) -> bool {
        self.buffer.iter().any(|q| q.event.coord() == coord)
    }

    fn joins<F>(&self, q: &Queued, eligible: &F) -> bool
    where
        F: Fn(&ComboSpec) -> bool,
    {
        let coord = q.event.coord();
        if self.is_buffered(coord) {
            return false;
        }
        let offset = self.buffer[0].since.saturating_sub(q.since);
        self.combos.iter().any(|c| {
            offset < c.term
                && c.coords.contains(&coord)
                && c.covers(&self.buffer)
                && eligible(&c.spec)
        })
    }

    /// The first eligible combo whose members are exactly the buffered
    /// presses, all within its window.
    fn complete<F>(&self, eligible: &F) -> Option<usize>
    where
        F: Fn(&ComboSpec) -> bool,
    {
        let (first, last) = (self.buffer.first()?, self.buffer.last()?);
        let span = first.since.saturating_sub(last.since);
        self.combos.iter().position(|c| {
            c.coords.len() == self.buffer.len()
                && span < c.term
                && c.covers(&self.buffer)
                && eligible(&c.spec)
        })
    }

    /// Whether a larger eligible combo can still complete.
    fn superset_pending<F>(&self, age: u16, eligible: &F) -> bool
    where
        F: Fn(&ComboSpec) -> bool,
    {
        self.combos.iter().any(|c| {
            c.coords.len() > self.buffer.len()
                && age < c.term
                && c.covers(&self.buffer)
                && eligible(&c.spec)
        })
    }

    fn member_released<F>(&mut self, q: Queued, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        let held_for = self
            .buffer
            .last()
            .map(|last| last.since.saturating_sub(q.since))
            .unwrap_or_default();
        match self.complete(eligible) {
            Some(i)
                if !self.combos[i].spec.must_hold
                    && !(self.combos[i].must_tap && held_for >= self.hold_term) =>
            {
                self.fire(i, out);
                self.release_unbuffered(q, out);
            }
            _ => {
                self.fall_through(eligible, out);
                self.push(q, eligible, out);
            }
        }
    }

    /// Another key was pressed, or a key outside the buffer was released.
    fn interrupt<F>(&mut self, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        match self.complete(eligible) {
            Some(i) if !self.combos[i].must_tap && !self.combos[i].spec.must_hold => {
                self.fire(i, out)
            }
            _ => self.fall_through(eligible, out),
        }
    }

    fn fire(&mut self, index: usize, out: &mut Queue) {
        let presses = std::mem::take(&mut self.buffer);
        let since = presses.last().map(|q| q.since).unwrap_or_default();
        log::debug!("combo {} fired", self.combos[index].spec.name);
        let index = index as u16;
        push_logged(
            out,
            Queued {
                event: Event::Press(COMBO_ROW, index),
                since,
            },
        );
        self.active.push(ActiveCombo {
            index,
            held: presses.iter().map(|q| q.event.coord()).collect(),
            released: false,
        });
    }

    /// Passes the oldest buffered press on, then feeds the rest back in: a
    /// later press may still start a combo of its own.
    fn fall_through<F>(&mut self, eligible: &F, out: &mut Queue)
    where
        F: Fn(&ComboSpec) -> bool,
    {
        let mut rest = std::mem::take(&mut self.buffer).into_iter();
        if let Some(first) = rest.next() {
            log::debug!("no combo for {:?}", first.event.coord());
            push_logged(out, first);
        }
        for q in rest {
            self.push(q, eligible, out);
        }
    }

    fn release_unbuffered(&mut self, q: Queued, out: &mut Queue) {
        let coord = q.event.coord();
        let Some(pos) = self.active.iter().position(|a| a.held.contains(&coord)) else {
            push_logged(out, q);
            return;
        };
        let active = &mut self.active[pos];
        active.held.retain(|c| *c != coord);
        if !active.released {
            active.released = true;
            push_logged(
                out,
                Queued {
                    event: Event::Release(COMBO_ROW, active.index),
                    since: q.since,
                },
            );
        }
        if active.held.is_empty() {
            self.active.remove(pos);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::{k, mt, osm};
    use crate::key_code::KeyCode::*;

    fn table() -> LayerTable {
        LayerTable::new(vec![
            vec![vec![k(Q), k(W), k(E), mt(RShift, J, 185), mt(RCtrl, K, 185), k(X)]],
            vec![vec![LogicalAction::Trans; 6]],
        ])
        .unwrap()
    }

    fn detector(specs: Vec<ComboSpec>) -> ComboDetector {
        let combos = resolve(specs, &table(), &ComboTerms::default()).unwrap();
        ComboDetector::new(combos, 125)
    }

    fn specs() -> Vec<ComboSpec> {
        vec![
            ComboSpec::new("qw", [k(Q), k(W)], osm(LGui)).tier(ComboTier::Fast),
            ComboSpec::new("qwe", [k(Q), k(W), k(E)], k(Escape)).tier(ComboTier::Slow),
            ComboSpec::new("jk", [mt(RShift, J, 185), mt(RCtrl, K, 185)], k(Escape)),
        ]
    }

    struct Run {
        det: ComboDetector,
        out: Queue,
    }

    impl Run {
        fn new(specs: Vec<ComboSpec>) -> Self {
            Self {
                det: detector(specs),
                out: Queue::new(),
            }
        }

        fn event(&mut self, event: Event) {
            self.det.event(event.into(), &|_: &ComboSpec| true, &mut self.out);
        }

        fn wait(&mut self, ms: u16) {
            for _ in 0..ms {
                self.det.tick();
                self.out.iter_mut().for_each(Queued::tick);
                self.det.settle(&|_: &ComboSpec| true, &mut self.out);
            }
        }

        fn drain(&mut self) -> Vec<Event> {
            let mut events = vec![];
            while let Some(q) = self.out.pop_front() {
                events.push(q.event);
            }
            events
        }
    }

    #[test]
    fn plain_combo_fires_once_and_swallows_members() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 0));
        run.wait(5);
        run.event(Event::Press(0, 1));
        assert_eq!(Vec::<Event>::new(), run.drain(), "qwe could still complete");
        run.wait(50);
        assert_eq!(vec![Event::Press(COMBO_ROW, 0)], run.drain());
        run.event(Event::Release(0, 1));
        run.event(Event::Release(0, 0));
        assert_eq!(vec![Event::Release(COMBO_ROW, 0)], run.drain());
    }

    #[test]
    fn three_key_combo_beats_its_subset() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 0));
        run.event(Event::Press(0, 1));
        run.wait(20);
        run.event(Event::Press(0, 2));
        assert_eq!(vec![Event::Press(COMBO_ROW, 1)], run.drain());
    }

    #[test]
    fn window_expiry_replays_events_with_their_age() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 3));
        run.wait(40);
        let replayed: Vec<Queued> = run.out.iter().copied().collect();
        assert_eq!(1, replayed.len());
        assert_eq!(Event::Press(0, 3), replayed[0].event);
        assert_eq!(40, replayed[0].since);
    }

    #[test]
    fn early_release_falls_through_in_order() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 0));
        run.wait(3);
        run.event(Event::Release(0, 0));
        assert_eq!(
            vec![Event::Press(0, 0), Event::Release(0, 0)],
            run.drain()
        );
    }

    #[test]
    fn must_tap_combo_fires_on_release() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 3));
        run.event(Event::Press(0, 4));
        run.wait(60);
        assert_eq!(Vec::<Event>::new(), run.drain());
        run.event(Event::Release(0, 3));
        run.event(Event::Release(0, 4));
        assert_eq!(
            vec![Event::Press(COMBO_ROW, 2), Event::Release(COMBO_ROW, 2)],
            run.drain()
        );
    }

    #[test]
    fn must_tap_combo_held_falls_through() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 3));
        run.wait(10);
        run.event(Event::Press(0, 4));
        run.wait(130);
        assert_eq!(vec![Event::Press(0, 3), Event::Press(0, 4)], run.drain());
    }

    #[test]
    fn other_key_interrupts() {
        let mut run = Run::new(specs());
        run.event(Event::Press(0, 3));
        run.event(Event::Press(0, 5));
        assert_eq!(vec![Event::Press(0, 3), Event::Press(0, 5)], run.drain());

        let mut run = Run::new(specs());
        run.event(Event::Press(0, 0));
        run.event(Event::Press(0, 1));
        run.event(Event::Press(0, 5));
        assert_eq!(
            vec![Event::Press(COMBO_ROW, 0), Event::Press(0, 5)],
            run.drain()
        );
    }

    #[test]
    fn must_hold_waits_for_hold_term() {
        let mut run = Run::new(vec![ComboSpec::new("qw", [k(Q), k(W)], osm(LGui)).must_hold()]);
        run.event(Event::Press(0, 0));
        run.event(Event::Press(0, 1));
        run.wait(100);
        run.event(Event::Release(0, 0));
        assert_eq!(
            vec![Event::Press(0, 0), Event::Press(0, 1), Event::Release(0, 0)],
            run.drain()
        );

        run.event(Event::Release(0, 1));
        run.drain();
        run.event(Event::Press(0, 0));
        run.event(Event::Press(0, 1));
        run.wait(125);
        assert_eq!(vec![Event::Press(COMBO_ROW, 0)], run.drain());
    }

    #[test]
    fn ineligible_combos_pass_events_through() {
        let mut run = Run::new(specs());
        run.det.event(Event::Press(0, 0).into(), &|_: &ComboSpec| false, &mut run.out);
        assert_eq!(vec![Event::Press(0, 0)], run.drain());
    }

    #[test]
    fn validation() {
        let err = |specs| resolve(specs, &table(), &ComboTerms::default()).map(|_| ());
        assert_eq!(
            Err(ConfigError::ComboTooShort { name: "q", len: 1 }),
            err(vec![ComboSpec::new("q", [k(Q)], k(A))])
        );
        assert!(matches!(
            err(vec![ComboSpec::new("qz", [k(Q), k(Z)], k(A))]),
            Err(ConfigError::ComboKeyNotOnBase { name: "qz", .. })
        ));
        assert_eq!(
            Err(ConfigError::ComboDualRole { name: "qw" }),
            err(vec![ComboSpec::new("qw", [k(Q), k(W)], mt(LShift, A, 100))])
        );
        assert_eq!(
            Err(ConfigError::DuplicateCombo {
                name: "wq",
                other: "qw"
            }),
            err(vec![
                ComboSpec::new("qw", [k(Q), k(W)], k(A)),
                ComboSpec::new("wq", [k(W), k(Q)], k(B)),
            ])
        );
        assert_eq!(
            Ok(()),
            err(vec![
                ComboSpec::new("qw", [k(Q), k(W)], k(A)).on(LayerPredicate::AnyOf(vec![0])),
                ComboSpec::new("wq", [k(W), k(Q)], k(B)).on(LayerPredicate::AnyOf(vec![1])),
            ])
        );
        let combos = resolve(specs(), &table(), &ComboTerms::default()).unwrap();
        assert!(!combos[0].must_tap);
        assert!(combos[2].must_tap);
        assert_eq!(18, combos[0].term);
    }
}
