//! Leader key sequences.

use radix_trie::Trie;

use crate::action::MacroStep;
use crate::error::ConfigError;
use crate::key_code::KeyCode;

/// Keys typed after the leader key, and the macro they run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderSequence {
    pub keys: Vec<KeyCode>,
    pub steps: Vec<MacroStep>,
}

impl LeaderSequence {
    pub fn new(keys: &[KeyCode], steps: Vec<MacroStep>) -> Self {
        Self {
            keys: keys.to_vec(),
            steps,
        }
    }
}

pub(crate) type LeaderTrie = Trie<Vec<u8>, Box<[MacroStep]>>;

fn trie_key(keys: &[KeyCode]) -> Vec<u8> {
    keys.iter().map(|kc| *kc as u8).collect()
}

/// Builds the sequence trie. No sequence may be a prefix of another, so an
/// exact match never has a longer continuation.
pub(crate) fn build_trie(sequences: &[LeaderSequence]) -> Result<LeaderTrie, ConfigError> {
    let mut trie = Trie::new();
    for seq in sequences {
        let key = trie_key(&seq.keys);
        if key.is_empty()
            || trie.get_ancestor(&key).is_some()
            || trie.get_raw_descendant(&key).is_some()
        {
            return Err(ConfigError::LeaderConflict {
                keys: format!("{:?}", seq.keys),
            });
        }
        trie.insert(key, seq.steps.clone().into_boxed_slice());
    }
    Ok(trie)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LeaderStep {
    /// More keys are needed.
    Pending,
    /// The sequence matched; run these steps.
    Done(Box<[MacroStep]>),
    /// No sequence starts with the keys typed so far.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LeaderState {
    sequence: Vec<u8>,
    deadline: u64,
}

impl LeaderState {
    pub(crate) fn new(now: u64, timeout: u16) -> Self {
        Self {
            sequence: vec![],
            deadline: now + u64::from(timeout),
        }
    }

    pub(crate) fn push(
        &mut self,
        kc: KeyCode,
        now: u64,
        timeout: u16,
        trie: &LeaderTrie,
    ) -> LeaderStep {
        self.sequence.push(kc as u8);
        log::debug!("leader got {kc:?}");
        if let Some(steps) = trie.get(&self.sequence) {
            return LeaderStep::Done(steps.clone());
        }
        if trie.get_raw_descendant(&self.sequence).is_some() {
            self.deadline = now + u64::from(timeout);
            LeaderStep::Pending
        } else {
            LeaderStep::NoMatch
        }
    }

    pub(crate) fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline
    }

    pub(crate) fn deadline(&self) -> u64 {
        self.deadline
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::text_steps;
    use crate::key_code::KeyCode::*;

    fn trie() -> LeaderTrie {
        build_trie(&[
            LeaderSequence::new(&[A, S], text_steps(":=")),
            LeaderSequence::new(&[R], text_steps("->")),
        ])
        .unwrap()
    }

    #[test]
    fn sequences_match_key_by_key() {
        let trie = trie();
        let mut leader = LeaderState::new(0, 300);
        assert_eq!(LeaderStep::Pending, leader.push(A, 100, 300, &trie));
        assert_eq!(400, leader.deadline());
        assert_eq!(
            LeaderStep::Done(text_steps(":=").into_boxed_slice()),
            leader.push(S, 200, 300, &trie)
        );

        let mut leader = LeaderState::new(0, 300);
        assert_eq!(LeaderStep::NoMatch, leader.push(Q, 10, 300, &trie));
    }

    #[test]
    fn prefixes_conflict() {
        let err = build_trie(&[
            LeaderSequence::new(&[A], vec![]),
            LeaderSequence::new(&[A, S], vec![]),
        ]);
        assert!(matches!(err, Err(ConfigError::LeaderConflict { .. })));
        let err = build_trie(&[
            LeaderSequence::new(&[A, S], vec![]),
            LeaderSequence::new(&[A], vec![]),
        ]);
        assert!(matches!(err, Err(ConfigError::LeaderConflict { .. })));
    }
}
