use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    Compulsory,
    Conflict,
    Capacity,
}

impl fmt::Display for MissKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissKind::Compulsory => write!(f, "compulsory"),
            MissKind::Conflict => write!(f, "conflict"),
            MissKind::Capacity => write!(f, "capacity"),
        }
    }
}

/// Every (set index, tag) pair ever requested. Entries are never removed:
/// this answers "seen before", not "currently resident".
#[derive(Debug, Default)]
pub struct VisitedKeys {
    keys: HashSet<u64>,
}

impl VisitedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(index: u32, tag: u32) -> u64 {
        ((index as u64) << 32) | tag as u64
    }

    pub fn contains(&self, key: u64) -> bool {
        self.keys.contains(&key)
    }

    /// Returns true when the key was not present before.
    pub fn insert(&mut self, key: u64) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// 3C classification of a lookup miss.
pub fn classify(is_new: bool, set_has_free_slot: bool, cache_full: bool) -> MissKind {
    match (is_new, set_has_free_slot, cache_full) {
        (true, true, _) => MissKind::Compulsory,
        (false, true, _) => MissKind::Conflict,
        (_, false, false) => MissKind::Conflict,
        (_, false, true) => MissKind::Capacity,
    }
}
