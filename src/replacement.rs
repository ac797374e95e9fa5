use crate::cache::{CacheSet, ReplacementPolicy};

/// Picks the way to fill on a miss.
pub struct Replacer {
    policy: ReplacementPolicy,
    rng: fastrand::Rng,
}

impl Replacer {
    pub fn new(policy: ReplacementPolicy, rng: fastrand::Rng) -> Self {
        Self { policy, rng }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn choose_way(&mut self, set: &CacheSet) -> usize {
        // An empty way always wins over evicting, whatever the policy.
        if let Some(way) = set.free_way() {
            return way;
        }
        match self.policy {
            ReplacementPolicy::Random => self.rng.usize(..set.lines().len()),
            ReplacementPolicy::Lru => least_recent(set),
        }
    }
}

// min_by_key returns the first minimum, so ties go to the lowest way.
fn least_recent(set: &CacheSet) -> usize {
    set.lines()
        .iter()
        .enumerate()
        .min_by_key(|(_, line)| line.last_used)
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheConfig};

    fn cache(assoc: u32) -> Cache {
        Cache::new(&CacheConfig {
            nsets: 1,
            bsize: 4,
            assoc,
            policy: ReplacementPolicy::Lru,
        })
    }

    #[test]
    fn free_way_preferred_for_both_policies() {
        let mut cache = cache(4);
        cache.install(0, 0, 1, 1);
        cache.install(0, 2, 2, 2);
        for policy in [ReplacementPolicy::Lru, ReplacementPolicy::Random] {
            let mut replacer = Replacer::new(policy, fastrand::Rng::with_seed(7));
            assert_eq!(replacer.choose_way(cache.set(0)), 1);
        }
    }

    #[test]
    fn lru_picks_smallest_stamp() {
        let mut cache = cache(4);
        cache.install(0, 0, 10, 5);
        cache.install(0, 1, 11, 2);
        cache.install(0, 2, 12, 9);
        cache.install(0, 3, 13, 7);
        let mut replacer = Replacer::new(ReplacementPolicy::Lru, fastrand::Rng::with_seed(1));
        assert_eq!(replacer.choose_way(cache.set(0)), 1);

        cache.touch(0, 1, 20);
        assert_eq!(replacer.choose_way(cache.set(0)), 0);
    }

    #[test]
    fn lru_ties_go_to_lowest_way() {
        let mut cache = cache(4);
        for way in 0..4 {
            cache.install(0, way, way as u32, 3);
        }
        let mut replacer = Replacer::new(ReplacementPolicy::Lru, fastrand::Rng::with_seed(1));
        assert_eq!(replacer.choose_way(cache.set(0)), 0);
    }

    #[test]
    fn random_stays_in_range() {
        let mut cache = cache(2);
        cache.install(0, 0, 1, 1);
        cache.install(0, 1, 2, 2);
        let mut replacer = Replacer::new(ReplacementPolicy::Random, fastrand::Rng::with_seed(99));
        for _ in 0..200 {
            assert!(replacer.choose_way(cache.set(0)) < 2);
        }
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let mut cache = cache(8);
        for way in 0..8 {
            cache.install(0, way, way as u32, 1);
        }
        let mut a = Replacer::new(ReplacementPolicy::Random, fastrand::Rng::with_seed(42));
        let mut b = Replacer::new(ReplacementPolicy::Random, fastrand::Rng::with_seed(42));
        let picks_a: Vec<_> = (0..32).map(|_| a.choose_way(cache.set(0))).collect();
        let picks_b: Vec<_> = (0..32).map(|_| b.choose_way(cache.set(0))).collect();
        assert_eq!(picks_a, picks_b);
    }
}
