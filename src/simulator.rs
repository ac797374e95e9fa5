use log::{debug, trace};

use crate::{
    cache::{AddressDecoder, Cache, CacheConfig, ReplacementPolicy},
    classify::{MissKind, VisitedKeys, classify},
    replacement::Replacer,
    stats::CacheStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    Miss(MissKind),
}

/// All state of one trace pass.
pub struct Simulator {
    decoder: AddressDecoder,
    cache: Cache,
    visited: VisitedKeys,
    replacer: Replacer,
    stats: CacheStats,
    global_tick: u64,
}

impl Simulator {
    /// `config` must already be validated.
    pub fn new(config: &CacheConfig, rng: fastrand::Rng) -> Self {
        Self {
            decoder: config.decoder(),
            cache: Cache::new(config),
            visited: VisitedKeys::new(),
            replacer: Replacer::new(config.policy, rng),
            stats: CacheStats::new(),
            global_tick: 1,
        }
    }

    pub fn run_trace(&mut self, addresses: &[u32]) -> &CacheStats {
        for &address in addresses {
            self.access(address);
        }
        self.stats()
    }

    pub fn access(&mut self, address: u32) -> AccessOutcome {
        let (index, tag) = self.decoder.decode(address);
        let tick = self.global_tick;
        self.global_tick += 1;

        if let Some(way) = self.cache.lookup(index, tag) {
            if self.replacer.policy() == ReplacementPolicy::Lru {
                self.cache.touch(index, way, tick);
            }
            self.stats.record_hit();
            trace!("{address:#010x} set {index} tag {tag:#x}: hit");
            return AccessOutcome::Hit;
        }

        let key = VisitedKeys::key(index, tag);
        let is_new = !self.visited.contains(key);
        let kind = classify(
            is_new,
            self.cache.has_free_slot(index),
            self.cache.is_globally_full(),
        );
        if is_new {
            self.visited.insert(key);
        }

        let way = self.replacer.choose_way(self.cache.set(index));
        match self.cache.install(index, way, tag, tick) {
            Some(victim) => debug!("set {index} way {way}: evict tag {victim:#x} for {tag:#x}"),
            None => self.stats.occupied = self.cache.occupied(),
        }
        self.stats.record_miss(kind);
        trace!("{address:#010x} set {index} tag {tag:#x}: {kind} miss");
        AccessOutcome::Miss(kind)
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn distinct_lines(&self) -> usize {
        self.visited.len()
    }
}
