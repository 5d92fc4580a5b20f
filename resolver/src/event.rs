//! Input events and the timestamped queue they wait in.

use arraydeque::ArrayDeque;

/// The coordinate type: (row, column) of a physical key.
pub type KCoord = (u8, u16);

/// Row used for the virtual coordinates of fired combos. The column is the
/// index of the combo in declaration order.
pub const COMBO_ROW: u8 = u8::MAX;

pub(crate) const QUEUE_SIZE: usize = 32;

/// The event queue between the combo detector and the tap-hold resolver.
pub(crate) type Queue = ArrayDeque<Queued, QUEUE_SIZE, arraydeque::behavior::Wrapping>;

/// An event on the key matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// Press event with coordinates (i, j).
    Press(u8, u16),
    /// Release event with coordinates (i, j).
    Release(u8, u16),
}

impl Event {
    /// Returns the coordinates (i, j) of the event.
    pub fn coord(self) -> KCoord {
        match self {
            Event::Press(i, j) => (i, j),
            Event::Release(i, j) => (i, j),
        }
    }

    /// Returns `true` if the event is a key press.
    pub fn is_press(self) -> bool {
        matches!(self, Event::Press(..))
    }

    /// Returns `true` if the event is a key release.
    pub fn is_release(self) -> bool {
        matches!(self, Event::Release(..))
    }
}

/// An event, waiting in a queue to be processed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Queued {
    pub(crate) event: Event,
    /// Milliseconds since the event happened.
    pub(crate) since: u16,
}

impl From<Event> for Queued {
    fn from(event: Event) -> Self {
        Queued { event, since: 0 }
    }
}

impl Queued {
    pub(crate) fn tick(&mut self) {
        self.since = self.since.saturating_add(1);
    }

    /// Get the [Event] from this object.
    pub fn event(&self) -> Event {
        self.event
    }

    /// Milliseconds since the event happened.
    pub fn since(&self) -> u16 {
        self.since
    }
}

/// Pushes to a wrapping queue, logging the event that falls off when it is full.
pub(crate) fn push_logged<const N: usize>(
    queue: &mut ArrayDeque<Queued, N, arraydeque::behavior::Wrapping>,
    queued: Queued,
) {
    if let Some(dropped) = queue.push_back(queued) {
        log::warn!("event queue full, dropping {:?}", dropped.event);
    }
}
